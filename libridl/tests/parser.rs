//
// tests/parser.rs
// The RIDL Compiler
//

#![deny(missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_qualifications)]

#[macro_use]
extern crate serde_json;
extern crate ridl;

mod common;

use common::*;
use ridl::model::{ Modifier, PredefinedType };


#[test]
fn empty_source() {
    let project = empty_project();
    parse_valid(&project, "");

    let global = global(&project);
    let ptr = global.borrow().unwrap();
    let namespace = ptr.as_namespace().unwrap();
    assert!(namespace.namespaces.is_empty());
    assert!(namespace.structs.is_empty());
    assert!(namespace.typedefs.is_empty());
}

#[test]
fn nested_namespaces() {
    let project = empty_project();
    parse_valid(&project, "namespace a { namespace b { } }");

    let global = global(&project);
    let a = child_namespace(&global, "a");
    let b = child_namespace(&a, "b");

    let ptr = b.borrow().unwrap();
    let namespace = ptr.as_namespace().unwrap();
    assert!(namespace.namespaces.is_empty());
    assert!(namespace.structs.is_empty());
    assert!(namespace.typedefs.is_empty());
}

#[test]
fn same_named_namespaces_merge() {
    let project = empty_project();
    parse_valid(&project, "namespace a { struct X {}; } namespace a { struct Y {}; }");

    let global = global(&project);
    let a = child_namespace(&global, "a");
    namespace_struct(&a, "X");
    namespace_struct(&a, "Y");
}

#[test]
fn typedef_of_modifier_soup() {
    let project = empty_project();
    parse_valid(&project, "namespace n { typedef unsigned long long U64; }");

    let n = child_namespace(&global(&project), "n");
    assert_eq!(resolved_basic(&n, "U64"), PredefinedType::ULongLong);
}

#[test]
fn documentation_and_modifier_attach_to_forward_struct() {
    let project = empty_project();
    parse_valid(&project, "/// doc\n[deprecated]\nstruct S;");

    let s = namespace_struct(&global(&project), "S");
    assert_eq!(documentation_of(&s), vec!["doc".to_owned()]);

    let ptr = s.borrow().unwrap();
    let strct = ptr.as_struct().unwrap();
    assert!(!strct.has_body);
    assert!(ptr.info().modifiers.contains_key(&Modifier::Deprecated));
}

#[test]
fn documentation_lines_accumulate_in_order() {
    let project = empty_project();
    parse_valid(&project, "/// first\n/// second\nstruct S;");

    let s = namespace_struct(&global(&project), "S");
    assert_eq!(documentation_of(&s), vec!["first".to_owned(), "second".to_owned()]);
}

#[test]
fn modifier_with_parameters() {
    let project = empty_project();
    parse_valid(&project, "[platform(ios, android), obsolete(\"use T2\")]\nstruct T;");

    let t = namespace_struct(&global(&project), "T");
    let ptr = t.borrow().unwrap();
    let modifiers = &ptr.info().modifiers;

    assert_eq!(
        modifiers.get(&Modifier::Platform),
        Some(&vec!["ios".to_owned(), "android".to_owned()])
    );
    assert_eq!(
        modifiers.get(&Modifier::Obsolete),
        Some(&vec!["\"use T2\"".to_owned()])
    );
}

#[test]
fn template_struct_with_defaulted_parameter() {
    let project = empty_project();
    parse_valid(
        &project,
        "template <typename T, typename U = int> struct Box { typedef T value_type; };",
    );

    let boxed = namespace_struct(&global(&project), "Box");

    {
        let ptr = boxed.borrow().unwrap();
        let strct = ptr.as_struct().unwrap();

        assert!(strct.has_body);
        assert_eq!(strct.generics.len(), 2);
        assert_eq!(name_of(&strct.generics[0]), "T");
        assert_eq!(name_of(&strct.generics[1]), "U");

        assert!(strct.generic_defaults[0].is_none());
        let default = strct.generic_defaults[1].clone().expect("U has a default");
        assert_eq!(terminal_basic(&default), PredefinedType::Int);
    }

    let value_type = struct_typedef(&boxed, "value_type");
    let original = typedef_original(&value_type);

    let ptr = original.borrow().unwrap();
    assert!(ptr.as_generic().is_some());
    assert_eq!(ptr.info().name, "T");
}

#[test]
fn bare_template_parameters_without_introducer() {
    let project = empty_project();
    parse_valid(&project, "template <K, V> struct Pair {};");

    let pair = namespace_struct(&global(&project), "Pair");
    let ptr = pair.borrow().unwrap();
    let strct = ptr.as_struct().unwrap();
    assert_eq!(strct.generics.len(), 2);
    assert_eq!(name_of(&strct.generics[0]), "K");
    assert_eq!(name_of(&strct.generics[1]), "V");
}

#[test]
fn interface_keywords() {
    let project = empty_project();
    parse_valid(&project, "struct Plain {}; interface I {}; interaction A {}; class C {};");

    let global = global(&project);
    for &(name, interface) in &[("Plain", false), ("I", true), ("A", true), ("C", true)] {
        let strct = namespace_struct(&global, name);
        let ptr = strct.borrow().unwrap();
        assert_eq!(ptr.as_struct().unwrap().is_interface, interface, "struct: {}", name);
    }
}

#[test]
fn forward_then_definition() {
    let project = empty_project();
    parse_valid(&project, "struct S; struct S { typedef int x; };");

    let s = namespace_struct(&global(&project), "S");
    let ptr = s.borrow().unwrap();
    assert!(ptr.as_struct().unwrap().has_body);
}

#[test]
fn inheritance_list() {
    let project = empty_project();
    parse_valid(&project, "struct A {}; struct B {}; struct C : A, B {};");

    let global = global(&project);
    let a = namespace_struct(&global, "A");
    let b = namespace_struct(&global, "B");
    let c = namespace_struct(&global, "C");

    let ptr = c.borrow().unwrap();
    let strct = ptr.as_struct().unwrap();
    assert_eq!(strct.related.len(), 2);
    assert!(strct.related[0] == a);
    assert!(strct.related[1] == b);
}

#[test]
fn nested_struct_and_typedef() {
    let project = empty_project();
    parse_valid(&project, "struct Outer { struct Inner {}; typedef int width; };");

    let outer = namespace_struct(&global(&project), "Outer");
    let ptr = outer.borrow().unwrap();
    let strct = ptr.as_struct().unwrap();
    assert!(strct.structs.contains_key("Inner"));
    assert!(strct.typedefs.contains_key("width"));
}

#[test]
fn exclusive_region_skipped_when_undefined() {
    let project = empty_project();
    parse_valid(&project, "//! EXCLUSIVE foo\nstruct Hidden {};\n//! EXCLUSIVE x\nstruct Visible {};");

    let global = global(&project);
    let ptr = global.borrow().unwrap();
    let namespace = ptr.as_namespace().unwrap();
    assert!(!namespace.structs.contains_key("Hidden"));
    assert!(namespace.structs.contains_key("Visible"));
}

#[test]
fn exclusive_region_kept_when_defined() {
    let project = project_from(json!({
        "name": "test",
        "exclusives": ["foo"],
    }));
    parse_valid(&project, "//! EXCLUSIVE foo\nstruct Hidden {};\n//! EXCLUSIVE x\nstruct Visible {};");

    let global = global(&project);
    let ptr = global.borrow().unwrap();
    let namespace = ptr.as_namespace().unwrap();
    assert!(namespace.structs.contains_key("Hidden"));
    assert!(namespace.structs.contains_key("Visible"));
}

#[test]
fn exclusive_identifier_x_is_case_insensitive() {
    let project = empty_project();
    parse_valid(&project, "//! EXCLUSIVE X\nstruct Kept {};");
    let global = global(&project);
    let ptr = global.borrow().unwrap();
    assert!(ptr.as_namespace().unwrap().structs.contains_key("Kept"));
}

#[test]
fn empty_directive_is_tolerated() {
    let project = empty_project();
    parse_valid(&project, "//!\nstruct S;");
    namespace_struct(&global(&project), "S");
}

#[test]
fn using_namespace_imports_types() {
    let project = empty_project();
    parse_valid(
        &project,
        "namespace a { struct S {}; typedef int T; } namespace b { using namespace a; }",
    );

    let global = global(&project);
    let a = child_namespace(&global, "a");
    let b = child_namespace(&global, "b");

    let imported_struct = namespace_typedef(&b, "S");
    assert!(typedef_original(&imported_struct) == namespace_struct(&a, "S"));

    let imported_typedef = namespace_typedef(&b, "T");
    assert!(typedef_original(&imported_typedef) == namespace_typedef(&a, "T"));
}

#[test]
fn using_namespace_skips_existing_bindings() {
    let project = empty_project();
    parse_valid(
        &project,
        "namespace a { typedef int T; } namespace b { typedef bool T; using namespace a; }",
    );

    let b = child_namespace(&global(&project), "b");
    assert_eq!(resolved_basic(&b, "T"), PredefinedType::Bool);
}

#[test]
fn using_imports_bootstrap_enums() {
    let project = project_from(json!({
        "name": "test",
        "enums": { "Color": ["red", "green", "blue"] },
    }));
    parse_valid(&project, "namespace b { using Color; }");

    let b = child_namespace(&global(&project), "b");
    let imported = namespace_typedef(&b, "Color");
    let original = typedef_original(&imported);
    let ptr = original.borrow().unwrap();
    let enumeration = ptr.as_enum().expect("imported type is not an enum");
    assert_eq!(enumeration.variants, vec!["red".to_owned(), "green".to_owned(), "blue".to_owned()]);
}

#[test]
fn using_single_type() {
    let project = empty_project();
    parse_valid(&project, "namespace a { struct S {}; } namespace b { using a::S; }");

    let global = global(&project);
    let a = child_namespace(&global, "a");
    let b = child_namespace(&global, "b");

    let imported = namespace_typedef(&b, "S");
    assert!(typedef_original(&imported) == namespace_struct(&a, "S"));
}

#[test]
fn scoped_type_reference() {
    let project = empty_project();
    parse_valid(&project, "namespace a { struct X {}; } namespace b { typedef a::X AX; }");

    let global = global(&project);
    let a = child_namespace(&global, "a");
    let b = child_namespace(&global, "b");

    let ax = namespace_typedef(&b, "AX");
    assert!(typedef_original(&ax) == namespace_struct(&a, "X"));
}

#[test]
fn typedef_redeclaration_is_silently_ignored() {
    let project = empty_project();
    parse_valid(&project, "typedef int T; typedef bool T;");

    assert_eq!(resolved_basic(&global(&project), "T"), PredefinedType::Int);
}

#[test]
fn aliases_expand_before_parsing() {
    let project = project_from(json!({
        "name": "test",
        "aliases": { "u64": "unsigned long long" },
    }));
    parse_valid(&project, "typedef u64 X;");

    assert_eq!(resolved_basic(&global(&project), "X"), PredefinedType::ULongLong);
}

#[test]
fn stray_semicolons_are_ignored() {
    let project = empty_project();
    parse_valid(&project, ";;; namespace a { ;; } ;");
    child_namespace(&global(&project), "a");
}

#[test]
fn invalid_sources() {
    test_invalid_cases(&[
        InvalidTestCase {
            source:  "namespace { }",
            message: "namespace missing identifier",
            line:    1,
        },
        InvalidTestCase {
            source:  "namespace a",
            message: "namespace unexpectedly reached end of input",
            line:    1,
        },
        InvalidTestCase {
            source:  "namespace a {\ntypedef",
            message: "typedef unexpectedly reached end of input",
            line:    2,
        },
        InvalidTestCase {
            source:  "struct ;",
            message: "struct/interface expecting name identifier",
            line:    1,
        },
        InvalidTestCase {
            source:  "struct S { ) }",
            message: "struct/interface brace mismatch",
            line:    1,
        },
        InvalidTestCase {
            source:  "struct S {",
            message: "struct/interface unexpectedly reached end of input",
            line:    1,
        },
        InvalidTestCase {
            source:  "struct S {}; struct S {};",
            message: "struct/interface was already defined: S",
            line:    1,
        },
        InvalidTestCase {
            source:  "struct S {\nfoo\n};",
            message: "struct/interface contains unrecognized content near \"foo\"",
            line:    2,
        },
        InvalidTestCase {
            source:  "template <typename T> interface I;",
            message: "struct/interface template is missing template body",
            line:    1,
        },
        InvalidTestCase {
            source:  "template <typename T> typedef int X;",
            message: "struct/interface template expecting keyword struct or interface",
            line:    1,
        },
        InvalidTestCase {
            source:  "template <typename T = int, typename U> struct P {};",
            message: "struct/interface template expecting default type",
            line:    1,
        },
        InvalidTestCase {
            source:  "struct C : , A {};",
            message: "struct/interface expecting related type name",
            line:    1,
        },
        InvalidTestCase {
            source:  "typedef int;",
            message: "typedef typename was not found",
            line:    1,
        },
        InvalidTestCase {
            source:  "using namespace nowhere;",
            message: "using namespace was not found: nowhere",
            line:    1,
        },
        InvalidTestCase {
            source:  "using nowhere;",
            message: "using type was not found: nowhere",
            line:    1,
        },
        InvalidTestCase {
            source:  "[frobnicate]\nstruct S;",
            message: "modifiers modifier is not recognized: frobnicate",
            line:    1,
        },
        InvalidTestCase {
            source:  "[deprecated, deprecated]\nstruct S;",
            message: "modifiers modifier is already set: deprecated",
            line:    1,
        },
        InvalidTestCase {
            source:  "[obsolete]\nstruct S;",
            message: "modifiers expecting parameters",
            line:    1,
        },
        InvalidTestCase {
            source:  "[obsolete(a, b)]\nstruct S;",
            message: "modifiers parameter count mismatch: expected 1, found 2",
            line:    1,
        },
        InvalidTestCase {
            source:  "garbage",
            message: "unrecognized content near \"garbage\"",
            line:    1,
        },
    ]);
}
