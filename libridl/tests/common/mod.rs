//
// tests/common/mod.rs
// The RIDL Compiler
//

#![allow(dead_code)]

use ridl::error::{ Error, Result };
use ridl::lexer;
use ridl::parser;
use ridl::model::{ self, PredefinedType, RcContext };


/// A source expected to be rejected, along with the exact
/// diagnostic and the line it must be reported at.
#[derive(Debug)]
pub struct InvalidTestCase {
    pub source:  &'static str,
    pub message: &'static str,
    pub line:    usize,
}

pub fn test_invalid_cases(cases: &[InvalidTestCase]) {
    for case in cases {
        let (message, line) = parse_invalid(case.source);
        assert_eq!(message, case.message, "wrong message for source: {}", case.source);
        assert_eq!(line, case.line, "wrong line for source: {}", case.source);
    }
}

/// Builds a project from a configuration document.
pub fn project_from(config: ::serde_json::Value) -> RcContext {
    model::create_project(&config).expect("configuration was rejected")
}

/// A project with no aliases, exclusives, or bootstrap types.
pub fn empty_project() -> RcContext {
    project_from(json!({ "name": "test" }))
}

/// Tokenizes, alias-substitutes, and parses one source into the
/// project's global namespace.
pub fn parse_into(project: &RcContext, source: &str) -> Result<()> {
    let mut tokens = lexer::tokenize(source, 1)?;
    {
        let ptr = project.borrow().expect("cannot borrow project");
        let root = ptr.as_project().expect("project root is not a project");
        lexer::replace_aliases(&mut tokens, &root.aliases)?;
    }
    parser::parse_source(project, tokens)
}

pub fn parse_valid(project: &RcContext, source: &str) {
    parse_into(project, source).expect("valid source was rejected");
}

/// Parses a source that must fail with a syntax error; returns the
/// message and line.
pub fn parse_invalid(source: &str) -> (String, usize) {
    let project = empty_project();
    match parse_into(&project, source) {
        Ok(_) => panic!("invalid source was accepted: {}", source),
        Err(Error::Syntax { message, line }) => (message, line),
        Err(err) => panic!("parser returned a non-syntactic error: {}", err),
    }
}

pub fn global(project: &RcContext) -> RcContext {
    model::global_namespace(project).expect("project has no global namespace")
}

pub fn child_namespace(scope: &RcContext, name: &str) -> RcContext {
    let ptr = scope.borrow().expect("cannot borrow scope");
    let namespace = ptr.as_namespace().expect("scope is not a namespace");
    namespace.namespaces.get(name).expect("no such child namespace").clone()
}

pub fn namespace_struct(scope: &RcContext, name: &str) -> RcContext {
    let ptr = scope.borrow().expect("cannot borrow scope");
    let namespace = ptr.as_namespace().expect("scope is not a namespace");
    namespace.structs.get(name).expect("no such struct").clone()
}

pub fn namespace_typedef(scope: &RcContext, name: &str) -> RcContext {
    let ptr = scope.borrow().expect("cannot borrow scope");
    let namespace = ptr.as_namespace().expect("scope is not a namespace");
    namespace.typedefs.get(name).expect("no such typedef").clone()
}

pub fn struct_typedef(scope: &RcContext, name: &str) -> RcContext {
    let ptr = scope.borrow().expect("cannot borrow scope");
    let strct = ptr.as_struct().expect("scope is not a struct");
    strct.typedefs.get(name).expect("no such typedef").clone()
}

/// The type a typedef directly renames.
pub fn typedef_original(typedef: &RcContext) -> RcContext {
    let ptr = typedef.borrow().expect("cannot borrow typedef");
    let td = ptr.as_typedef().expect("context is not a typedef");
    td.original_type.to_rc().expect("typedef's original type is gone")
}

/// Follows typedef chains to the terminal type and demands that it
/// be one of the predefined basic types.
pub fn terminal_basic(ty: &RcContext) -> PredefinedType {
    let terminal = model::walk_typedef_chain(ty).expect("typedef chain walk failed");
    let ptr = terminal.borrow().expect("cannot borrow terminal type");
    ptr.as_basic().expect("terminal type is not a basic type").base
}

/// Convenience: the predefined base a named typedef of a namespace
/// ultimately resolves to.
pub fn resolved_basic(scope: &RcContext, typedef_name: &str) -> PredefinedType {
    let typedef = namespace_typedef(scope, typedef_name);
    terminal_basic(&typedef)
}

pub fn documentation_of(context: &RcContext) -> Vec<String> {
    context.borrow().expect("cannot borrow context").info().documentation.clone()
}

pub fn name_of(context: &RcContext) -> String {
    context.borrow().expect("cannot borrow context").info().name.clone()
}
