//
// tests/stream.rs
// The RIDL Compiler
//

#![deny(missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications)]

extern crate ridl;

use ridl::error::Error;
use ridl::lexer::{ self, TokenKind, TokenList };
use ridl::stream::TokenStack;


fn tokens_of(source: &str) -> TokenList {
    lexer::tokenize(source, 1).expect("test source must lex")
}

fn lexemes(tokens: &TokenList) -> Vec<String> {
    tokens.iter().map(|token| token.lexeme.clone()).collect()
}


#[test]
fn push_extract_pop() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a b"));

    assert!(stack.has_more());
    assert_eq!(stack.extract("test").unwrap().lexeme, "a");
    assert_eq!(stack.peek("test").unwrap().lexeme, "b");
    assert_eq!(stack.extract("test").unwrap().lexeme, "b");
    assert!(!stack.has_more());

    let leftovers = stack.pop();
    assert!(leftovers.is_empty());
}

#[test]
fn nested_frames_hide_the_outer_stream() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("outer"));
    stack.push(tokens_of("inner"));

    assert_eq!(stack.extract("test").unwrap().lexeme, "inner");
    assert!(!stack.has_more());

    stack.pop();
    assert_eq!(stack.extract("test").unwrap().lexeme, "outer");
}

#[test]
fn end_of_input_reports_the_last_consumed_line() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a\nb\nc"));

    while stack.has_more() {
        stack.extract("drain").unwrap();
    }

    match stack.extract("production") {
        Err(Error::Syntax { message, line }) => {
            assert_eq!(message, "production unexpectedly reached end of input");
            assert_eq!(line, 3);
        },
        other => panic!("expected an end-of-input error, got: {:?}", other),
    }
}

#[test]
fn put_back_restores_the_front() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a b"));

    let a = stack.extract("test").unwrap();
    stack.put_back(a);
    assert_eq!(stack.extract("test").unwrap().lexeme, "a");
}

#[test]
fn put_back_many_preserves_order() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("x"));

    stack.put_back_many(tokens_of("a b c"));

    let mut drained = Vec::new();
    while stack.has_more() {
        drained.push(stack.extract("test").unwrap().lexeme.clone());
    }
    assert_eq!(drained, vec!["a", "b", "c", "x"]);
}

#[test]
fn balanced_extraction_counts_every_brace_kind() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("( a { b } [ c ] < d > ) trailing"));

    let mut region = TokenList::new();
    let found = stack.extract_to_closing_brace("test", &mut region, true).unwrap();

    assert!(found);
    assert_eq!(
        lexemes(&region),
        vec!["(", "a", "{", "b", "}", "[", "c", "]", "<", "d", ">", ")"]
    );
    assert_eq!(stack.peek("test").unwrap().lexeme, "trailing");
}

#[test]
fn stripping_the_outer_pair() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("{ a b }"));

    let mut region = TokenList::new();
    stack.extract_to_closing_brace("test", &mut region, false).unwrap();
    assert_eq!(lexemes(&region), vec!["a", "b"]);
}

#[test]
fn non_brace_front_extracts_nothing() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a ( b )"));

    let mut region = TokenList::new();
    let found = stack.extract_to_closing_brace("test", &mut region, true).unwrap();

    assert!(!found);
    assert!(region.is_empty());
    assert_eq!(stack.peek("test").unwrap().lexeme, "a");
}

#[test]
fn mismatched_close_is_an_error() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("( a }"));

    let mut region = TokenList::new();
    match stack.extract_to_closing_brace("test", &mut region, true) {
        Err(Error::Syntax { message, .. }) => assert_eq!(message, "test brace mismatch"),
        other => panic!("expected a brace mismatch, got: {:?}", other),
    }
}

#[test]
fn comma_splitting_protects_bracketed_regions() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a ( b , c ) d , e"));

    let mut first = TokenList::new();
    stack.extract_to_comma("test", &mut first).unwrap();
    assert_eq!(lexemes(&first), vec!["a", "(", "b", ",", "c", ")", "d"]);

    let mut second = TokenList::new();
    stack.extract_to_comma("test", &mut second).unwrap();
    assert_eq!(lexemes(&second), vec!["e"]);
    assert!(!stack.has_more());
}

#[test]
fn searched_token_can_be_left_in_the_stream() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a = b"));

    let mut prefix = TokenList::new();
    stack.extract_to_token_kind("test", TokenKind::EqualsOperator, &mut prefix, false, true).unwrap();

    assert_eq!(lexemes(&prefix), vec!["a"]);
    assert_eq!(stack.peek("test").unwrap().kind, TokenKind::EqualsOperator);
}

#[test]
fn close_brace_at_depth_zero_ends_the_scan() {
    let mut stack = TokenStack::new();
    stack.push(tokens_of("a , b )"));

    let mut first = TokenList::new();
    stack.extract_to_comma("test", &mut first).unwrap();
    assert_eq!(lexemes(&first), vec!["a"]);

    let mut second = TokenList::new();
    stack.extract_to_comma("test", &mut second).unwrap();
    assert_eq!(lexemes(&second), vec!["b"]);

    // the unmatched close brace is left for the caller
    assert_eq!(stack.peek("test").unwrap().lexeme, ")");
}
