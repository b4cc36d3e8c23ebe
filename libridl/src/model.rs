//
// model.rs
// The RIDL Compiler
//

//! The semantic object model. Parsing folds declarations into a
//! tree of contexts rooted at the project's global namespace:
//! namespaces own namespaces, structs, enums and typedefs; structs
//! own nested structs, typedefs and their generic parameters. Every
//! node keeps a non-owning back-reference to its defining scope, so
//! type lookup can walk upward to the parent and then outward to
//! siblings, the way C++ name lookup does.

use std::collections::{ BTreeMap, BTreeSet };
use serde_json::Value;
use error::{ Error, Result };
use util::{ RcCell, WkCell };


/// Strong handle to a node of the semantic tree.
pub type RcContext = RcCell<Context>;
/// Weak (non-owning) handle to a node of the semantic tree.
pub type WkContext = WkCell<Context>;

// A typedef chain longer than this is assumed to be cyclic,
// which the parser never produces.
const TYPEDEF_CHAIN_LIMIT: usize = 64;


/// The fixed set of predefined primitive typedefs the type
/// resolver can construct without user input. Every one of these
/// is registered, under its lowercase name, on the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PredefinedType {
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    Short,
    SShort,
    UShort,
    Int,
    SInt,
    UInt,
    Long,
    SLong,
    ULong,
    LongLong,
    SLongLong,
    ULongLong,
    Int8,
    SInt8,
    UInt8,
    Int16,
    SInt16,
    UInt16,
    Int32,
    SInt32,
    UInt32,
    Int64,
    SInt64,
    UInt64,
    Byte,
    Word,
    Dword,
    Qword,
    Float,
    Float32,
    Float64,
    Double,
    LDouble,
    Pointer,
    Binary,
    Size,
    String,
    AString,
    WString,
}

impl PredefinedType {
    /// Every predefined typedef, in declaration order.
    pub const ALL: &'static [PredefinedType] = &[
        PredefinedType::Void,
        PredefinedType::Bool,
        PredefinedType::Char,
        PredefinedType::SChar,
        PredefinedType::UChar,
        PredefinedType::Short,
        PredefinedType::SShort,
        PredefinedType::UShort,
        PredefinedType::Int,
        PredefinedType::SInt,
        PredefinedType::UInt,
        PredefinedType::Long,
        PredefinedType::SLong,
        PredefinedType::ULong,
        PredefinedType::LongLong,
        PredefinedType::SLongLong,
        PredefinedType::ULongLong,
        PredefinedType::Int8,
        PredefinedType::SInt8,
        PredefinedType::UInt8,
        PredefinedType::Int16,
        PredefinedType::SInt16,
        PredefinedType::UInt16,
        PredefinedType::Int32,
        PredefinedType::SInt32,
        PredefinedType::UInt32,
        PredefinedType::Int64,
        PredefinedType::SInt64,
        PredefinedType::UInt64,
        PredefinedType::Byte,
        PredefinedType::Word,
        PredefinedType::Dword,
        PredefinedType::Qword,
        PredefinedType::Float,
        PredefinedType::Float32,
        PredefinedType::Float64,
        PredefinedType::Double,
        PredefinedType::LDouble,
        PredefinedType::Pointer,
        PredefinedType::Binary,
        PredefinedType::Size,
        PredefinedType::String,
        PredefinedType::AString,
        PredefinedType::WString,
    ];

    /// The name under which this type is registered and found.
    pub fn name(self) -> &'static str {
        match self {
            PredefinedType::Void      => "void",
            PredefinedType::Bool      => "bool",
            PredefinedType::Char      => "char",
            PredefinedType::SChar     => "schar",
            PredefinedType::UChar     => "uchar",
            PredefinedType::Short     => "short",
            PredefinedType::SShort    => "sshort",
            PredefinedType::UShort    => "ushort",
            PredefinedType::Int       => "int",
            PredefinedType::SInt      => "sint",
            PredefinedType::UInt      => "uint",
            PredefinedType::Long      => "long",
            PredefinedType::SLong     => "slong",
            PredefinedType::ULong     => "ulong",
            PredefinedType::LongLong  => "longlong",
            PredefinedType::SLongLong => "slonglong",
            PredefinedType::ULongLong => "ulonglong",
            PredefinedType::Int8      => "int8",
            PredefinedType::SInt8     => "sint8",
            PredefinedType::UInt8     => "uint8",
            PredefinedType::Int16     => "int16",
            PredefinedType::SInt16    => "sint16",
            PredefinedType::UInt16    => "uint16",
            PredefinedType::Int32     => "int32",
            PredefinedType::SInt32    => "sint32",
            PredefinedType::UInt32    => "uint32",
            PredefinedType::Int64     => "int64",
            PredefinedType::SInt64    => "sint64",
            PredefinedType::UInt64    => "uint64",
            PredefinedType::Byte      => "byte",
            PredefinedType::Word      => "word",
            PredefinedType::Dword     => "dword",
            PredefinedType::Qword     => "qword",
            PredefinedType::Float     => "float",
            PredefinedType::Float32   => "float32",
            PredefinedType::Float64   => "float64",
            PredefinedType::Double    => "double",
            PredefinedType::LDouble   => "ldouble",
            PredefinedType::Pointer   => "pointer",
            PredefinedType::Binary    => "binary",
            PredefinedType::Size      => "size",
            PredefinedType::String    => "string",
            PredefinedType::AString   => "astring",
            PredefinedType::WString   => "wstring",
        }
    }

    /// Looks up a predefined typedef by its registered name.
    pub fn from_name(name: &str) -> Option<PredefinedType> {
        PredefinedType::ALL.iter().cloned().find(|ty| ty.name() == name)
    }
}


/// The catalog of bracketed modifiers (`[name, name(arg, …), …]`)
/// a declaration may be annotated with. Each entry knows how many
/// parameters it takes; `-1` means variadic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    /// The struct is a plain data dictionary, not an interface.
    Dictionary,
    /// The struct describes an exception type.
    Exception,
    /// Members of the annotated context are static.
    Static,
    /// The annotated context receives special-cased code generation.
    Special,
    /// The annotated value may be omitted.
    Optional,
    /// The annotated value may be null.
    Nullable,
    /// The declaration is deprecated.
    Deprecated,
    /// The declaration is obsolete; takes the replacement hint.
    Obsolete,
    /// Restricts the declaration to the listed platforms.
    Platform,
}

impl Modifier {
    /// Looks up a modifier by its (lowercased) name.
    pub fn from_name(name: &str) -> Option<Modifier> {
        match name {
            "dictionary" => Some(Modifier::Dictionary),
            "exception"  => Some(Modifier::Exception),
            "static"     => Some(Modifier::Static),
            "special"    => Some(Modifier::Special),
            "optional"   => Some(Modifier::Optional),
            "nullable"   => Some(Modifier::Nullable),
            "deprecated" => Some(Modifier::Deprecated),
            "obsolete"   => Some(Modifier::Obsolete),
            "platform"   => Some(Modifier::Platform),
            _ => None,
        }
    }

    /// The name this modifier is written as in IDL source.
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Dictionary => "dictionary",
            Modifier::Exception  => "exception",
            Modifier::Static     => "static",
            Modifier::Special    => "special",
            Modifier::Optional   => "optional",
            Modifier::Nullable   => "nullable",
            Modifier::Deprecated => "deprecated",
            Modifier::Obsolete   => "obsolete",
            Modifier::Platform   => "platform",
        }
    }

    /// Expected parameter count; `-1` is variadic, anything else
    /// is exact.
    pub fn total_params(self) -> isize {
        match self {
            Modifier::Obsolete => 1,
            Modifier::Platform => -1,
            _ => 0,
        }
    }
}


/// The capability set shared by every context: a name, accumulated
/// documentation lines, attached modifiers, and the non-owning
/// back-reference to the defining scope.
#[derive(Debug, Default)]
pub struct ContextInfo {
    /// The name the context is registered under; empty for the
    /// global namespace and for unnamed synthesized typedefs.
    pub name: String,
    /// Documentation lines (`/// …`) attached to the declaration.
    pub documentation: Vec<String>,
    /// Bracketed modifiers attached to the declaration, with their
    /// parameter values.
    pub modifiers: BTreeMap<Modifier, Vec<String>>,
    /// The defining scope. Empty only for the project root.
    pub parent: WkContext,
}

/// The project root: configuration state plus the global namespace
/// and the registry of predefined basic types.
#[derive(Debug, Default)]
pub struct Project {
    pub info: ContextInfo,
    /// identifier → replacement text, applied to every token stream
    /// before parsing.
    pub aliases: BTreeMap<String, String>,
    /// Gate identifiers enabling `EXCLUSIVE <id>` regions.
    pub defined_exclusives: BTreeSet<String>,
    /// The predefined basic types, by name.
    pub basic_types: BTreeMap<String, RcContext>,
    /// The global namespace; always present after project creation.
    pub global: Option<RcContext>,
}

/// A namespace: the only context that owns other namespaces.
#[derive(Debug, Default)]
pub struct Namespace {
    pub info: ContextInfo,
    pub namespaces: BTreeMap<String, RcContext>,
    pub structs: BTreeMap<String, RcContext>,
    pub enums: BTreeMap<String, RcContext>,
    pub typedefs: BTreeMap<String, RcContext>,
}

/// A struct or interface declaration.
#[derive(Debug, Default)]
pub struct Struct {
    pub info: ContextInfo,
    /// Declared with `class`/`interface`/`interaction` rather
    /// than `struct`.
    pub is_interface: bool,
    /// Whether a `{ … }` body has been seen; forward declarations
    /// leave this false.
    pub has_body: bool,
    pub structs: BTreeMap<String, RcContext>,
    pub typedefs: BTreeMap<String, RcContext>,
    /// Generic (template) parameters, in declaration order.
    pub generics: Vec<RcContext>,
    /// Default types parallel to `generics`; `None` where a
    /// parameter has no default.
    pub generic_defaults: Vec<Option<RcContext>>,
    /// Inherited (related) types, in declaration order.
    pub related: Vec<RcContext>,
}

/// An enumeration. The IDL grammar itself does not declare enums;
/// they enter the model through configuration documents and are
/// then importable with `using`.
#[derive(Debug, Default)]
pub struct EnumType {
    pub info: ContextInfo,
    pub variants: Vec<String>,
}

/// A typedef: a named (or synthesized, unnamed) reference to
/// another type, optionally carrying modifier flags of its own.
#[derive(Debug, Default)]
pub struct TypedefType {
    pub info: ContextInfo,
    /// `const` was folded into this typedef.
    pub constant: bool,
    /// The renamed type. Non-owning; the chain of these never
    /// forms a cycle.
    pub original_type: WkContext,
    /// Template arguments recorded for a reference to a generic
    /// struct. Instantiation is left to later stages.
    pub template_arguments: Vec<RcContext>,
}

/// One of the fixed predefined primitive typedefs.
#[derive(Debug)]
pub struct BasicType {
    pub info: ContextInfo,
    pub base: PredefinedType,
}

/// A template parameter of a generic struct.
#[derive(Debug, Default)]
pub struct GenericType {
    pub info: ContextInfo,
}

/// A node of the semantic tree. The variants share the capability
/// set carried by `ContextInfo`; the type-like variants (`Struct`,
/// `Enum`, `Typedef`, `Basic`, `Generic`) are what scope lookup
/// resolves type paths to.
#[derive(Debug)]
pub enum Context {
    Project(Project),
    Namespace(Namespace),
    Struct(Struct),
    Enum(EnumType),
    Typedef(TypedefType),
    Basic(BasicType),
    Generic(GenericType),
}

impl Context {
    /// The shared capability set of this node.
    pub fn info(&self) -> &ContextInfo {
        match *self {
            Context::Project(ref project)     => &project.info,
            Context::Namespace(ref namespace) => &namespace.info,
            Context::Struct(ref strct)        => &strct.info,
            Context::Enum(ref enumeration)    => &enumeration.info,
            Context::Typedef(ref typedef)     => &typedef.info,
            Context::Basic(ref basic)         => &basic.info,
            Context::Generic(ref generic)     => &generic.info,
        }
    }

    /// Mutable access to the shared capability set.
    pub fn info_mut(&mut self) -> &mut ContextInfo {
        match *self {
            Context::Project(ref mut project)     => &mut project.info,
            Context::Namespace(ref mut namespace) => &mut namespace.info,
            Context::Struct(ref mut strct)        => &mut strct.info,
            Context::Enum(ref mut enumeration)    => &mut enumeration.info,
            Context::Typedef(ref mut typedef)     => &mut typedef.info,
            Context::Basic(ref mut basic)         => &mut basic.info,
            Context::Generic(ref mut generic)     => &mut generic.info,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match *self {
            Context::Project(ref project) => Some(project),
            _ => None,
        }
    }

    pub fn as_project_mut(&mut self) -> Option<&mut Project> {
        match *self {
            Context::Project(ref mut project) => Some(project),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match *self {
            Context::Namespace(ref namespace) => Some(namespace),
            _ => None,
        }
    }

    pub fn as_namespace_mut(&mut self) -> Option<&mut Namespace> {
        match *self {
            Context::Namespace(ref mut namespace) => Some(namespace),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match *self {
            Context::Struct(ref strct) => Some(strct),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut Struct> {
        match *self {
            Context::Struct(ref mut strct) => Some(strct),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match *self {
            Context::Enum(ref enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_typedef(&self) -> Option<&TypedefType> {
        match *self {
            Context::Typedef(ref typedef) => Some(typedef),
            _ => None,
        }
    }

    pub fn as_typedef_mut(&mut self) -> Option<&mut TypedefType> {
        match *self {
            Context::Typedef(ref mut typedef) => Some(typedef),
            _ => None,
        }
    }

    pub fn as_basic(&self) -> Option<&BasicType> {
        match *self {
            Context::Basic(ref basic) => Some(basic),
            _ => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericType> {
        match *self {
            Context::Generic(ref generic) => Some(generic),
            _ => None,
        }
    }

    //
    // Node constructors. None of these inserts the new node into
    // its parent; registration is the caller's (the parser's) job.
    //

    /// Creates a project root with its basic-type registry and an
    /// empty global namespace.
    pub fn new_project() -> Result<RcContext> {
        let project = RcCell::new(Context::Project(Project::default()));

        {
            let weak = project.to_weak();
            let mut ptr = project.borrow_mut()?;
            let root = ptr.as_project_mut().ok_or_else(lazy_bug!("freshly made project is not a project"))?;

            for &base in PredefinedType::ALL {
                let name = base.name().to_owned();
                let node = RcCell::new(Context::Basic(BasicType {
                    info: ContextInfo {
                        name: name.clone(),
                        parent: weak.clone(),
                        ..ContextInfo::default()
                    },
                    base,
                }));
                root.basic_types.insert(name, node);
            }
        }

        let global = Context::new_namespace("", &project);
        {
            let mut ptr = project.borrow_mut()?;
            let root = ptr.as_project_mut().ok_or_else(lazy_bug!("freshly made project is not a project"))?;
            root.global = Some(global);
        }

        Ok(project)
    }

    pub fn new_namespace(name: &str, parent: &RcContext) -> RcContext {
        RcCell::new(Context::Namespace(Namespace {
            info: ContextInfo {
                name: name.to_owned(),
                parent: parent.to_weak(),
                ..ContextInfo::default()
            },
            ..Namespace::default()
        }))
    }

    pub fn new_struct(name: &str, parent: &RcContext, is_interface: bool) -> RcContext {
        RcCell::new(Context::Struct(Struct {
            info: ContextInfo {
                name: name.to_owned(),
                parent: parent.to_weak(),
                ..ContextInfo::default()
            },
            is_interface,
            ..Struct::default()
        }))
    }

    /// Creates an unnamed typedef with no original type yet; the
    /// caller fills both in.
    pub fn new_typedef(parent: &RcContext) -> RcContext {
        RcCell::new(Context::Typedef(TypedefType {
            info: ContextInfo {
                parent: parent.to_weak(),
                ..ContextInfo::default()
            },
            ..TypedefType::default()
        }))
    }

    pub fn new_generic(name: &str, parent: &RcContext) -> RcContext {
        RcCell::new(Context::Generic(GenericType {
            info: ContextInfo {
                name: name.to_owned(),
                parent: parent.to_weak(),
                ..ContextInfo::default()
            },
        }))
    }

    pub fn new_enum(name: &str, parent: &RcContext, variants: Vec<String>) -> RcContext {
        RcCell::new(Context::Enum(EnumType {
            info: ContextInfo {
                name: name.to_owned(),
                parent: parent.to_weak(),
                ..ContextInfo::default()
            },
            variants,
        }))
    }
}


/// The global namespace of a project root.
pub fn global_namespace(project: &RcContext) -> Result<RcContext> {
    let ptr = project.borrow()?;
    let root = ptr.as_project().ok_or_else(lazy_bug!("project root is not a project"))?;
    root.global.clone().ok_or_else(lazy_bug!("project has no global namespace"))
}

// What a path segment is allowed to bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    // Namespaces only (every segment of a `using namespace` path).
    Namespace,
    // Anything that can contain further names (intermediate
    // segments of a type path).
    Scope,
    // Type-like nodes (the final segment of a type path).
    Type,
}

/// Resolves a `::`-separated namespace path, searching the scope
/// itself first and then walking outward through its parents.
/// Returns `None` when nothing matches anywhere.
pub fn find_namespace(scope: &RcContext, path: &str) -> Result<Option<RcContext>> {
    search_outward(scope, path, Lookup::Namespace)
}

/// Resolves a `::`-separated type path, searching the scope itself
/// first and then walking outward through its parents. The final
/// segment may name a typedef, struct, enum, template generic, or
/// a predefined basic type; intermediate segments must be
/// namespaces or structs. Returns `None` when nothing matches.
pub fn find_type(scope: &RcContext, path: &str) -> Result<Option<RcContext>> {
    search_outward(scope, path, Lookup::Type)
}

fn search_outward(scope: &RcContext, path: &str, last: Lookup) -> Result<Option<RcContext>> {
    let segments: Vec<&str> = path.split("::").filter(|segment| !segment.is_empty()).collect();
    if segments.is_empty() {
        return Ok(None);
    }

    let mut current = scope.clone();

    loop {
        if let Some(found) = descend(&current, &segments, last)? {
            return Ok(Some(found));
        }

        let parent = current.borrow()?.info().parent.clone();
        match parent.to_rc() {
            Ok(outer) => current = outer,
            Err(_) => return Ok(None),
        }
    }
}

// Resolves every segment strictly inside `scope`, without
// consulting parents.
fn descend(scope: &RcContext, segments: &[&str], last: Lookup) -> Result<Option<RcContext>> {
    let intermediate = match last {
        Lookup::Namespace => Lookup::Namespace,
        _ => Lookup::Scope,
    };

    let mut node = scope.clone();

    for (index, segment) in segments.iter().enumerate() {
        let lookup = if index + 1 == segments.len() { last } else { intermediate };
        let child = find_local(&node, segment, lookup)?;

        match child {
            Some(found) => node = found,
            None => return Ok(None),
        }
    }

    Ok(Some(node))
}

// One-level lookup in a scope's own maps.
fn find_local(scope: &RcContext, name: &str, lookup: Lookup) -> Result<Option<RcContext>> {
    let ptr = scope.borrow()?;

    let found = match *ptr {
        Context::Project(ref project) => {
            match lookup {
                Lookup::Type => project.basic_types.get(name).cloned(),
                _ => None,
            }
        },
        Context::Namespace(ref namespace) => {
            match lookup {
                Lookup::Namespace => namespace.namespaces.get(name).cloned(),
                Lookup::Scope => namespace.namespaces.get(name).cloned()
                    .or_else(|| namespace.structs.get(name).cloned()),
                Lookup::Type => namespace.typedefs.get(name).cloned()
                    .or_else(|| namespace.structs.get(name).cloned())
                    .or_else(|| namespace.enums.get(name).cloned()),
            }
        },
        Context::Struct(ref strct) => {
            match lookup {
                Lookup::Namespace => None,
                Lookup::Scope => strct.structs.get(name).cloned(),
                Lookup::Type => {
                    let named = strct.typedefs.get(name).cloned()
                        .or_else(|| strct.structs.get(name).cloned());
                    match named {
                        Some(found) => Some(found),
                        None => find_generic(strct, name)?,
                    }
                },
            }
        },
        _ => None,
    };

    Ok(found)
}

fn find_generic(strct: &Struct, name: &str) -> Result<Option<RcContext>> {
    for generic in &strct.generics {
        if generic.borrow()?.info().name == name {
            return Ok(Some(generic.clone()));
        }
    }
    Ok(None)
}

/// Follows `original_type` references through typedefs until a
/// non-typedef is reached. The walk is step-capped; exceeding the
/// cap means the graph holds a typedef cycle, which is an ICE.
pub fn walk_typedef_chain(ty: &RcContext) -> Result<RcContext> {
    let mut current = ty.clone();
    let mut steps = 0;

    loop {
        let next = {
            let ptr = current.borrow()?;
            match ptr.as_typedef() {
                Some(typedef) => Some(typedef.original_type.to_rc()?),
                None => None,
            }
        };

        match next {
            Some(underlying) => {
                steps += 1;
                if steps > TYPEDEF_CHAIN_LIMIT {
                    bug!("typedef chain exceeds {} links; graph must be cyclic", TYPEDEF_CHAIN_LIMIT);
                }
                current = underlying;
            },
            None => return Ok(current),
        }
    }
}

/// Collapses a typedef that renames nothing and adds nothing (no
/// name, no constness, no modifiers, no template arguments) to its
/// underlying type. Anything else is returned unchanged.
pub fn bypass_noop_typedef(ty: &RcContext) -> Result<RcContext> {
    let underlying = {
        let ptr = ty.borrow()?;
        match *ptr {
            Context::Typedef(ref typedef) => {
                let noop = !typedef.constant
                    && typedef.template_arguments.is_empty()
                    && typedef.info.name.is_empty()
                    && typedef.info.modifiers.is_empty()
                    && typedef.info.documentation.is_empty();
                if noop {
                    Some(typedef.original_type.to_rc()?)
                } else {
                    None
                }
            },
            _ => None,
        }
    };

    match underlying {
        Some(inner) => Ok(inner),
        None => Ok(ty.clone()),
    }
}


/// Builds a fresh project from a configuration document.
pub fn create_project(root: &Value) -> Result<RcContext> {
    let project = Context::new_project()?;
    parse_project_config(&project, root)?;
    Ok(project)
}

/// Merges a configuration document into an existing project:
/// project name, aliases, defined exclusives, and bootstrap enums.
pub fn parse_project_config(project: &RcContext, root: &Value) -> Result<()> {
    let object = match root.as_object() {
        Some(object) => object,
        None => return Err(Error::Failure {
            message: "configuration root must be a JSON object".to_owned(),
        }),
    };

    let global = global_namespace(project)?;

    {
        let mut ptr = project.borrow_mut()?;
        let state = ptr.as_project_mut().ok_or_else(lazy_bug!("project root is not a project"))?;

        if let Some(name) = object.get("name").and_then(Value::as_str) {
            state.info.name = name.to_owned();
        }

        if let Some(aliases) = object.get("aliases") {
            let aliases = aliases.as_object().ok_or_else(|| Error::Failure {
                message: "configuration \"aliases\" must be an object".to_owned(),
            })?;
            for (alias, replacement) in aliases {
                let replacement = replacement.as_str().ok_or_else(|| Error::Failure {
                    message: format!("alias \"{}\" must map to a string", alias),
                })?;
                state.aliases.insert(alias.clone(), replacement.to_owned());
            }
        }

        if let Some(exclusives) = object.get("exclusives") {
            let exclusives = exclusives.as_array().ok_or_else(|| Error::Failure {
                message: "configuration \"exclusives\" must be an array".to_owned(),
            })?;
            for exclusive in exclusives {
                if let Some(id) = exclusive.as_str() {
                    state.defined_exclusives.insert(id.to_owned());
                }
            }
        }
    }

    if let Some(enums) = object.get("enums") {
        let enums = enums.as_object().ok_or_else(|| Error::Failure {
            message: "configuration \"enums\" must be an object".to_owned(),
        })?;

        for (name, variants) in enums {
            let variants = variants.as_array().ok_or_else(|| Error::Failure {
                message: format!("enum \"{}\" must list its variants as an array", name),
            })?;

            let variant_names = variants.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect();

            let node = Context::new_enum(name, &global, variant_names);

            let mut ptr = global.borrow_mut()?;
            let namespace = ptr.as_namespace_mut().ok_or_else(lazy_bug!("global namespace is not a namespace"))?;
            if !namespace.enums.contains_key(name) {
                namespace.enums.insert(name.clone(), node);
            }
        }
    }

    Ok(())
}
