//
// lib.rs
// The RIDL Compiler
//

//! `ridl` is the library behind the RIDL compiler: a front-end for
//! a C++-flavoured Interface Definition Language. It scans IDL
//! source into a normalized token stream, drives a recursive-descent
//! parser over a stack of token streams, resolves C-style type
//! modifier soup against a fixed set of predefined primitive
//! typedefs, and folds the declarations into a semantic object
//! model (namespaces, structs/interfaces, typedefs, generic
//! parameters and type references) ready for downstream code
//! generation.
//!
//! The pipeline, leaves first:
//!
//! * [`lexer`]: byte cursor → token stream.
//! * [`stream`]: the token-stack machine with brace-balanced
//!   extraction, the backbone of re-entrant parsing.
//! * [`parser`]: the recursive-descent productions and semantic
//!   folding.
//! * [`resolver`]: token runs denoting types → semantic types.
//! * [`model`]: the semantic object model itself.
//! * [`compiler`]: the driver tying configuration, file loading,
//!   de-duplication and parsing together.

#![crate_name="ridl"]
#![crate_type="rlib"]

#![deny(missing_debug_implementations, missing_copy_implementations,
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications)]

extern crate serde_json;

pub mod util;
#[macro_use]
pub mod error;
pub mod lexer;
pub mod stream;
pub mod model;
pub mod resolver;
pub mod parser;
pub mod compiler;
