//
// parser.rs
// The RIDL Compiler
//

//! The recursive-descent parser. The top-level loop (and the loop
//! over every namespace and struct body) repeatedly attempts the
//! productions in a fixed order; each returns whether it consumed
//! anything. Balanced regions are extracted from the active token
//! stream and pushed back onto the token-stack machine so that
//! every production only ever sees exactly the tokens that belong
//! to it.
//!
//! Beyond recognizing the grammar, the parser is also the semantic
//! folder: declarations are inserted into the object model as they
//! are recognized, pending documentation and bracketed modifiers
//! are drained into the next context created, and `EXCLUSIVE`
//! directives gate whole regions of input.

use std::collections::BTreeMap;
use std::mem;
use error::{ Error, Result };
use lexer::{ self, RcToken, TokenKind, TokenList };
use stream::TokenStack;
use model::{ self, Context, Modifier, RcContext };
use resolver;


/// Parses one alias-substituted translation unit into the
/// project's global namespace. A fresh token stack is built per
/// invocation, so an aborted parse cannot leak stream frames into
/// a later one.
pub fn parse_source(project: &RcContext, tokens: TokenList) -> Result<()> {
    Parser::new(project).parse(tokens)
}

struct Parser {
    project: RcContext,
    stack: TokenStack,
    pending_documentation: Vec<RcToken>,
    pending_modifiers: BTreeMap<String, Vec<String>>,
}

impl Parser {
    fn new(project: &RcContext) -> Parser {
        Parser {
            project: project.clone(),
            stack: TokenStack::new(),
            pending_documentation: Vec::new(),
            pending_modifiers: BTreeMap::new(),
        }
    }

    fn parse(mut self, tokens: TokenList) -> Result<()> {
        let global = model::global_namespace(&self.project)?;

        self.stack.push(tokens);
        self.parse_namespace_contents(&global)?;

        if self.stack.has_more() {
            let token = self.stack.peek("translation unit")?;
            syntax_error!(token.line, "unrecognized content near \"{}\"", token.lexeme);
        }
        self.stack.pop();

        // orphan documentation or modifiers at end of input attach
        // to nothing and are dropped
        self.pending_documentation.clear();
        self.pending_modifiers.clear();

        Ok(())
    }

    //
    // The production loops
    //

    fn parse_namespace_contents(&mut self, namespace: &RcContext) -> Result<()> {
        while self.stack.has_more() {
            if self.parse_documentation()? { continue; }
            if self.parse_semicolon()? { continue; }
            if self.parse_directive()? { continue; }
            if self.parse_modifiers()? { continue; }
            if self.parse_namespace(namespace)? { continue; }
            if self.parse_using(namespace)? { continue; }
            if self.parse_typedef(namespace)? { continue; }
            if self.parse_struct(namespace)? { continue; }
            break;
        }

        Ok(())
    }

    fn parse_struct_contents(&mut self, strct: &RcContext) -> Result<()> {
        while self.stack.has_more() {
            if self.parse_documentation()? { continue; }
            if self.parse_semicolon()? { continue; }
            if self.parse_directive()? { continue; }
            if self.parse_modifiers()? { continue; }
            if self.parse_typedef(strct)? { continue; }
            if self.parse_struct(strct)? { continue; }
            break;
        }

        if self.stack.has_more() {
            let token = self.stack.peek("struct/interface")?;
            syntax_error!(token.line, "struct/interface contains unrecognized content near \"{}\"", token.lexeme);
        }

        Ok(())
    }

    //
    // Trivial productions
    //

    fn parse_documentation(&mut self) -> Result<bool> {
        let mut found = false;

        while self.stack.has_more() {
            let token = self.stack.peek("documentation")?;
            if token.kind != TokenKind::Documentation {
                return Ok(found);
            }

            found = true;
            let token = self.stack.extract("documentation")?;
            self.pending_documentation.push(token);
        }

        Ok(found)
    }

    fn parse_semicolon(&mut self) -> Result<bool> {
        let token = self.stack.peek(";")?;
        if token.kind != TokenKind::SemiColon {
            return Ok(false);
        }
        self.stack.extract(";")?;
        Ok(true)
    }

    fn parse_comma(&mut self) -> Result<bool> {
        let token = self.stack.peek(",")?;
        if token.kind != TokenKind::CommaOperator {
            return Ok(false);
        }
        self.stack.extract(",")?;
        Ok(true)
    }

    //
    // Directives
    //

    fn parse_directive(&mut self) -> Result<bool> {
        let what = "directive";

        let token = self.stack.peek(what)?;
        if token.kind != TokenKind::Directive {
            return Ok(false);
        }
        self.stack.extract(what)?;

        self.push_directive_tokens(&token)?;

        loop {
            let exclusive = if self.stack.has_more() {
                self.parse_directive_exclusive()?
            } else {
                None
            };

            match exclusive {
                Some(true) => {
                    // undefined exclusive: skip input until the next
                    // directive re-enables parsing (or input runs out)
                    self.stack.pop();

                    let mut next_directive = None;
                    while self.stack.has_more() {
                        let token = self.stack.extract(what)?;
                        if token.kind == TokenKind::Directive {
                            next_directive = Some(token);
                            break;
                        }
                    }

                    match next_directive {
                        Some(token) => self.push_directive_tokens(&token)?,
                        None => return Ok(true),
                    }
                },
                _ => break,
            }
        }

        self.stack.pop();
        Ok(true)
    }

    fn push_directive_tokens(&mut self, token: &RcToken) -> Result<()> {
        let tokens = lexer::tokenize(&token.lexeme, token.line)?;
        self.stack.push(tokens);
        Ok(())
    }

    // `EXCLUSIVE <id>`: returns `None` for any other directive
    // content, otherwise whether the gated region is to be ignored.
    fn parse_directive_exclusive(&mut self) -> Result<Option<bool>> {
        let what = "directive EXCLUSIVE";

        let token = self.stack.peek(what)?;
        if token.kind != TokenKind::Identifier || token.lexeme != "EXCLUSIVE" {
            return Ok(None);
        }
        self.stack.extract(what)?;

        let token = self.stack.extract(what)?;
        if token.kind != TokenKind::Identifier {
            syntax_error!(self.stack.last_line(), "{} expecting identifier", what);
        }

        let ignore = {
            let ptr = self.project.borrow()?;
            let project = ptr.as_project().ok_or_else(lazy_bug!("project root is not a project"))?;
            !(token.lexeme.eq_ignore_ascii_case("x")
                || project.defined_exclusives.contains(&token.lexeme))
        };

        Ok(Some(ignore))
    }

    //
    // Bracketed modifier lists
    //

    fn parse_modifiers(&mut self) -> Result<bool> {
        let what = "modifiers";

        {
            let token = self.stack.peek(what)?;
            if token.kind != TokenKind::SquareBrace || !token.is_open_brace() {
                return Ok(false);
            }
        }

        let mut all_modifier_tokens = TokenList::new();
        self.stack.extract_to_closing_brace(what, &mut all_modifier_tokens, false)?;

        self.stack.push(all_modifier_tokens);

        while self.stack.has_more() {
            let mut modifier_tokens = TokenList::new();
            self.stack.extract_to_comma(what, &mut modifier_tokens)?;

            self.stack.push(modifier_tokens);

            let token = self.stack.extract(what)?;
            if token.kind != TokenKind::Identifier {
                syntax_error!(self.stack.last_line(), "{} expecting identifier", what);
            }

            let name = token.lexeme.to_lowercase();
            let modifier = match Modifier::from_name(&name) {
                Some(modifier) => modifier,
                None => syntax_error!(
                    self.stack.last_line(),
                    "{} modifier is not recognized: {}",
                    what,
                    token.lexeme
                ),
            };
            let total_params = modifier.total_params();

            let mut values: Vec<String> = Vec::new();

            if self.stack.has_more() {
                let mut param_region = TokenList::new();
                self.stack.extract_to_closing_brace(what, &mut param_region, false)?;

                self.stack.push(param_region);
                while self.stack.has_more() {
                    let mut param_tokens = TokenList::new();
                    self.stack.extract_to_comma(what, &mut param_tokens)?;

                    let mut value = String::new();
                    self.stack.push(param_tokens);
                    while self.stack.has_more() {
                        let token = self.stack.extract(what)?;
                        if !value.is_empty() {
                            value.push(' ');
                        }
                        value.push_str(&token.lexeme);
                    }
                    self.stack.pop(); // param_tokens

                    values.push(value);
                }
                self.stack.pop(); // param_region
            } else if total_params != 0 {
                syntax_error!(self.stack.last_line(), "{} expecting parameters", what);
            }

            if total_params != -1 && total_params as usize != values.len() {
                syntax_error!(
                    self.stack.last_line(),
                    "{} parameter count mismatch: expected {}, found {}",
                    what,
                    total_params,
                    values.len()
                );
            }

            if self.pending_modifiers.contains_key(&name) {
                syntax_error!(self.stack.last_line(), "{} modifier is already set: {}", what, name);
            }
            self.pending_modifiers.insert(name, values);

            self.stack.pop(); // modifier_tokens
        }

        self.stack.pop(); // all_modifier_tokens
        Ok(true)
    }

    //
    // Namespaces and using-declarations
    //

    fn parse_namespace(&mut self, parent: &RcContext) -> Result<bool> {
        let what = "namespace";

        {
            let token = self.stack.peek(what)?;
            if token.kind != TokenKind::Identifier || token.lexeme != "namespace" {
                return Ok(false);
            }
        }
        self.stack.extract(what)?; // skip "namespace"

        let token = self.stack.extract(what)?;
        if token.kind != TokenKind::Identifier {
            syntax_error!(self.stack.last_line(), "{} missing identifier", what);
        }
        let name = token.lexeme.clone();

        let token = self.stack.extract(what)?;
        if token.kind != TokenKind::CurlyBrace || !token.is_open_brace() {
            syntax_error!(self.stack.last_line(), "{} expecting \"{{\"", what);
        }

        // same-named nested namespaces merge with the existing entry
        let namespace_obj = {
            let existing = {
                let ptr = parent.borrow()?;
                match ptr.as_namespace() {
                    Some(namespace) => namespace.namespaces.get(&name).cloned(),
                    None => None,
                }
            };

            match existing {
                Some(namespace) => namespace,
                None => {
                    let namespace = Context::new_namespace(&name, parent);
                    let mut ptr = parent.borrow_mut()?;
                    let outer = ptr.as_namespace_mut().ok_or_else(lazy_bug!("namespace parent is not a namespace"))?;
                    outer.namespaces.insert(name.clone(), namespace.clone());
                    namespace
                },
            }
        };

        self.fill_context(&namespace_obj)?;

        self.parse_namespace_contents(&namespace_obj)?;

        let token = self.stack.extract(what)?;
        if token.kind != TokenKind::CurlyBrace || !token.is_close_brace() {
            syntax_error!(self.stack.last_line(), "{} expecting \"}}\"", what);
        }

        Ok(true)
    }

    fn parse_using(&mut self, namespace: &RcContext) -> Result<bool> {
        let what = "using";

        {
            let token = self.stack.peek(what)?;
            if token.kind != TokenKind::Identifier || token.lexeme != "using" {
                return Ok(false);
            }
        }
        self.stack.extract(what)?; // skip "using"

        let importing_namespace = {
            let token = self.stack.peek(what)?;
            token.kind == TokenKind::Identifier && token.lexeme == "namespace"
        };

        if importing_namespace {
            self.stack.extract(what)?; // skip "namespace"

            let path = self.extract_path_to_semicolon(what)?;
            let found = match model::find_namespace(namespace, &path)? {
                Some(found) => found,
                None => syntax_error!(self.stack.last_line(), "{} namespace was not found: {}", what, path),
            };

            self.process_using_namespace(namespace, &found)?;
            return Ok(true);
        }

        let path = self.extract_path_to_semicolon(what)?;
        let found = match model::find_type(namespace, &path)? {
            Some(found) => found,
            None => syntax_error!(self.stack.last_line(), "{} type was not found: {}", what, path),
        };

        self.process_using_type(namespace, &found)?;
        Ok(true)
    }

    // Concatenates token lexemes up to (but not including) the
    // next semicolon into a `::`-qualified path string.
    fn extract_path_to_semicolon(&mut self, what: &str) -> Result<String> {
        let mut path = String::new();

        loop {
            let token = self.stack.peek(what)?;
            if token.kind == TokenKind::SemiColon {
                return Ok(path);
            }
            self.stack.extract(what)?;
            path.push_str(&token.lexeme);
        }
    }

    // `using namespace <path>;` imports every enum, struct and
    // typedef of the referenced namespace as typedefs of the
    // current one, first binding wins.
    fn process_using_namespace(&mut self, current: &RcContext, using: &RcContext) -> Result<()> {
        if current == using {
            return Ok(());
        }

        let imports = {
            let ptr = using.borrow()?;
            let source = ptr.as_namespace().ok_or_else(lazy_bug!("using namespace is not a namespace"))?;

            let mut imports = Vec::new();
            for (name, ty) in &source.enums {
                imports.push((name.clone(), ty.clone()));
            }
            for (name, ty) in &source.structs {
                imports.push((name.clone(), ty.clone()));
            }
            for (name, ty) in &source.typedefs {
                imports.push((name.clone(), ty.clone()));
            }
            imports
        };

        let mut ptr = current.borrow_mut()?;
        let target = ptr.as_namespace_mut().ok_or_else(lazy_bug!("using target is not a namespace"))?;

        for (name, ty) in imports {
            if target.typedefs.contains_key(&name) {
                continue;
            }

            let imported = Context::new_typedef(current);
            {
                let mut imported_ptr = imported.borrow_mut()?;
                {
                    let td = imported_ptr.as_typedef_mut().ok_or_else(lazy_bug!("freshly made typedef is not a typedef"))?;
                    td.original_type = ty.to_weak();
                }
                imported_ptr.info_mut().name = name.clone();
            }
            target.typedefs.insert(name, imported);
        }

        Ok(())
    }

    // `using <type-path>;` imports a single named type.
    fn process_using_type(&mut self, current: &RcContext, ty: &RcContext) -> Result<()> {
        let ty = model::bypass_noop_typedef(ty)?;
        let name = ty.borrow()?.info().name.clone();

        {
            let ptr = current.borrow()?;
            let target = ptr.as_namespace().ok_or_else(lazy_bug!("using target is not a namespace"))?;
            if target.typedefs.contains_key(&name) {
                return Ok(());
            }
        }

        let imported = Context::new_typedef(current);
        {
            let mut imported_ptr = imported.borrow_mut()?;
            {
                let td = imported_ptr.as_typedef_mut().ok_or_else(lazy_bug!("freshly made typedef is not a typedef"))?;
                td.original_type = ty.to_weak();
            }
            imported_ptr.info_mut().name = name.clone();
        }

        let mut ptr = current.borrow_mut()?;
        let target = ptr.as_namespace_mut().ok_or_else(lazy_bug!("using target is not a namespace"))?;
        target.typedefs.insert(name, imported);

        Ok(())
    }

    //
    // Typedefs
    //

    fn parse_typedef(&mut self, context: &RcContext) -> Result<bool> {
        let what = "typedef";

        {
            let token = self.stack.peek(what)?;
            if token.kind != TokenKind::Identifier || token.lexeme != "typedef" {
                return Ok(false);
            }
        }
        self.stack.extract(what)?; // skip "typedef"

        let mut type_tokens = TokenList::new();
        loop {
            let token = self.stack.peek(what)?;
            if token.kind == TokenKind::SemiColon {
                break;
            }
            type_tokens.push_back(self.stack.extract(what)?);
        }

        if type_tokens.len() < 2 {
            syntax_error!(self.stack.last_line(), "{} typename was not found", what);
        }

        let last = type_tokens.pop_back().ok_or_else(lazy_bug!("typedef token run vanished"))?;
        if last.kind != TokenKind::Identifier {
            syntax_error!(self.stack.last_line(), "{} identifier was not found", what);
        }

        self.process_typedef(context, &type_tokens, &last.lexeme)?;
        Ok(true)
    }

    fn process_typedef(&mut self, context: &RcContext, type_tokens: &TokenList, name: &str) -> Result<()> {
        let what = "typedef";

        let mut created = None;
        let ty = resolver::find_type_or_create_typedef(&mut self.stack, context, type_tokens, &mut created)?;

        let typedef = match created {
            Some(synthesized) => {
                let resolvable = {
                    let ptr = synthesized.borrow()?;
                    let td = ptr.as_typedef().ok_or_else(lazy_bug!("synthesized typedef is not a typedef"))?;
                    td.original_type.to_rc().is_ok()
                };
                if !resolvable {
                    syntax_error!(self.stack.last_line(), "{} original type was not found", what);
                }
                synthesized
            },
            None => {
                let fresh = Context::new_typedef(context);
                {
                    let mut ptr = fresh.borrow_mut()?;
                    let td = ptr.as_typedef_mut().ok_or_else(lazy_bug!("freshly made typedef is not a typedef"))?;
                    td.original_type = ty.to_weak();
                }
                fresh
            },
        };

        typedef.borrow_mut()?.info_mut().name = name.to_owned();
        self.fill_context(&typedef)?;

        let mut ptr = context.borrow_mut()?;
        match *ptr {
            Context::Namespace(ref mut namespace) => {
                // re-declarations with the same name are accepted silently
                if !namespace.typedefs.contains_key(name) {
                    namespace.typedefs.insert(name.to_owned(), typedef);
                }
            },
            Context::Struct(ref mut strct) => {
                if !strct.typedefs.contains_key(name) {
                    strct.typedefs.insert(name.to_owned(), typedef);
                }
            },
            _ => syntax_error!(self.stack.last_line(), "{} found in context that does not allow typedefs", what),
        }

        Ok(())
    }

    //
    // Structs and interfaces
    //

    fn parse_struct(&mut self, context: &RcContext) -> Result<bool> {
        let what = "struct/interface";

        let mut token = self.stack.peek(what)?;
        if token.kind != TokenKind::Identifier {
            return Ok(false);
        }

        let mut found_template = false;
        let mut template_tokens = TokenList::new();

        if token.lexeme == "template" {
            found_template = true;
            self.stack.extract(what)?; // skip "template"

            if !self.stack.extract_to_closing_brace(what, &mut template_tokens, false)? {
                syntax_error!(self.stack.last_line(), "{} template expecting arguments", what);
            }

            token = self.stack.peek(what)?;
        }

        let is_interface = match &token.lexeme[..] {
            "struct" => false,
            "class" | "interface" | "interaction" => true,
            _ => {
                if found_template {
                    syntax_error!(self.stack.last_line(), "{} template expecting keyword struct or interface", what);
                }
                return Ok(false);
            },
        };
        self.stack.extract(what)?; // skip the keyword

        let token = self.stack.extract(what)?;
        if token.kind != TokenKind::Identifier {
            syntax_error!(self.stack.last_line(), "{} expecting name identifier", what);
        }
        let struct_name = token.lexeme.clone();

        {
            let token = self.stack.peek(what)?;
            if token.kind == TokenKind::SemiColon {
                if found_template {
                    syntax_error!(self.stack.last_line(), "{} template is missing template body", what);
                }
                self.process_struct_forward(context, &struct_name, is_interface)?;
                return Ok(true);
            }
        }

        let (new_struct, created) = self.process_struct_forward(context, &struct_name, is_interface)?;
        if !created {
            let already_defined = {
                let ptr = new_struct.borrow()?;
                ptr.as_struct().map_or(false, |strct| strct.has_body)
            };
            if already_defined {
                syntax_error!(self.stack.last_line(), "{} was already defined: {}", what, struct_name);
            }
        }
        {
            let mut ptr = new_struct.borrow_mut()?;
            let strct = ptr.as_struct_mut().ok_or_else(lazy_bug!("struct node is not a struct"))?;
            strct.has_body = true;
            strct.is_interface = is_interface;
        }

        if found_template {
            self.parse_template_parameters(&new_struct, template_tokens)?;
        }

        // optional inheritance list
        {
            let token = self.stack.peek(what)?;
            if token.kind == TokenKind::ColonOperator {
                self.stack.extract(what)?; // skip ":"

                let mut inherit_tokens = TokenList::new();
                loop {
                    let token = self.stack.peek(what)?;
                    if token.kind == TokenKind::CurlyBrace {
                        break;
                    }
                    if token.kind == TokenKind::CommaOperator {
                        self.stack.extract(what)?;
                        if inherit_tokens.is_empty() {
                            syntax_error!(self.stack.last_line(), "{} expecting related type name", what);
                        }
                        self.process_related(&new_struct, &inherit_tokens)?;
                        inherit_tokens.clear();
                        continue;
                    }
                    inherit_tokens.push_back(self.stack.extract(what)?);
                }

                if inherit_tokens.is_empty() {
                    syntax_error!(self.stack.last_line(), "{} expecting related type name", what);
                }
                self.process_related(&new_struct, &inherit_tokens)?;
            }
        }

        {
            let token = self.stack.peek(what)?;
            if token.kind != TokenKind::CurlyBrace || !token.is_open_brace() {
                syntax_error!(self.stack.last_line(), "{} expecting \"{{\"", what);
            }
        }

        let mut struct_tokens = TokenList::new();
        self.stack.extract_to_closing_brace(what, &mut struct_tokens, false)?;

        self.stack.push(struct_tokens);
        self.parse_struct_contents(&new_struct)?;
        self.stack.pop();

        Ok(true)
    }

    // `template < T, typename U = int, … >`: each parameter is an
    // identifier (optionally introduced by `typename`/`class`),
    // optionally defaulted; once one parameter has a default, all
    // the following ones must have defaults too.
    fn parse_template_parameters(&mut self, strct: &RcContext, template_tokens: TokenList) -> Result<()> {
        let what = "struct/interface";
        let mut found_default = false;

        self.stack.push(template_tokens);

        while self.stack.has_more() {
            if self.parse_comma()? {
                continue;
            }

            let mut token = self.stack.extract(what)?;
            if token.kind == TokenKind::Identifier
                && (token.lexeme == "typename" || token.lexeme == "class")
                && self.stack.has_more()
                && self.stack.peek(what)?.kind == TokenKind::Identifier
            {
                token = self.stack.extract(what)?;
            }

            if token.kind != TokenKind::Identifier {
                syntax_error!(self.stack.last_line(), "{} template expecting generic name", what);
            }

            let generic = Context::new_generic(&token.lexeme, strct);

            let mut default_type = None;
            if self.stack.has_more() {
                let defaulted = self.stack.peek(what)?.kind == TokenKind::EqualsOperator;
                if defaulted {
                    self.stack.extract(what)?; // skip "="

                    let mut type_tokens = TokenList::new();
                    self.stack.extract_to_comma(what, &mut type_tokens)?;

                    let mut created = None;
                    let ty = resolver::find_type_or_create_typedef(&mut self.stack, strct, &type_tokens, &mut created)?;
                    default_type = Some(ty);
                    found_default = true;
                }
            }

            if found_default && default_type.is_none() {
                syntax_error!(self.stack.last_line(), "{} template expecting default type", what);
            }

            let mut ptr = strct.borrow_mut()?;
            let target = ptr.as_struct_mut().ok_or_else(lazy_bug!("struct node is not a struct"))?;
            target.generics.push(generic);
            target.generic_defaults.push(default_type);
        }

        self.stack.pop();
        Ok(())
    }

    // Finds or creates the struct node for a (possibly forward)
    // declaration, draining pending documentation/modifiers either
    // way. The flag reports whether the node was newly created.
    fn process_struct_forward(
        &mut self,
        context: &RcContext,
        name: &str,
        is_interface: bool,
    ) -> Result<(RcContext, bool)> {
        let existing = {
            let ptr = context.borrow()?;
            match *ptr {
                Context::Namespace(ref namespace) => namespace.structs.get(name).cloned(),
                Context::Struct(ref strct) => strct.structs.get(name).cloned(),
                _ => syntax_error!(
                    self.stack.last_line(),
                    "struct/interface forward not attached to namespace or struct context"
                ),
            }
        };

        if let Some(strct) = existing {
            self.fill_context(&strct)?;
            return Ok((strct, false));
        }

        let strct = Context::new_struct(name, context, is_interface);
        self.fill_context(&strct)?;

        let mut ptr = context.borrow_mut()?;
        match *ptr {
            Context::Namespace(ref mut namespace) => {
                namespace.structs.insert(name.to_owned(), strct.clone());
            },
            Context::Struct(ref mut outer) => {
                outer.structs.insert(name.to_owned(), strct.clone());
            },
            _ => bug!("struct context changed kind mid-parse"),
        }

        Ok((strct, true))
    }

    fn process_related(&mut self, strct: &RcContext, type_tokens: &TokenList) -> Result<()> {
        let mut created = None;
        let ty = resolver::find_type_or_create_typedef(&mut self.stack, strct, type_tokens, &mut created)?;

        let mut ptr = strct.borrow_mut()?;
        let target = ptr.as_struct_mut().ok_or_else(lazy_bug!("struct node is not a struct"))?;
        target.related.push(ty);

        Ok(())
    }

    //
    // Pending documentation and modifiers
    //

    // Drains the pending buffers into a freshly created (or
    // re-opened) context. Each pending run attaches exactly once,
    // to the declaration it precedes.
    fn fill_context(&mut self, context: &RcContext) -> Result<()> {
        self.merge_documentation(context)?;
        self.merge_modifiers(context)?;
        Ok(())
    }

    fn merge_documentation(&mut self, context: &RcContext) -> Result<()> {
        if self.pending_documentation.is_empty() {
            return Ok(());
        }

        let mut ptr = context.borrow_mut()?;
        let info = ptr.info_mut();
        for token in self.pending_documentation.drain(..) {
            info.documentation.push(token.lexeme.trim().to_owned());
        }

        Ok(())
    }

    fn merge_modifiers(&mut self, context: &RcContext) -> Result<()> {
        if self.pending_modifiers.is_empty() {
            return Ok(());
        }

        let pending = mem::replace(&mut self.pending_modifiers, BTreeMap::new());

        let mut ptr = context.borrow_mut()?;
        let info = ptr.info_mut();

        for (name, values) in pending {
            let modifier = Modifier::from_name(&name)
                .ok_or_else(lazy_bug!("pending modifier \"{}\" vanished from the catalog", name))?;

            if info.modifiers.contains_key(&modifier) {
                syntax_error!(self.stack.last_line(), "merge modifiers has duplicate modifier: {}", name);
            }
            info.modifiers.insert(modifier, values);
        }

        Ok(())
    }
}
