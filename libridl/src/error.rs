//
// error.rs
// The RIDL Compiler
//

//! This module defines the types for representing possible errors
//! that may be generated during the compilation of IDL source
//! code, along with macros for reporting them in a way that is
//! consistent across modules. Two of the variants are user-facing:
//! `Failure` is a domain error without a precise location (a file
//! that cannot be loaded, an invalid configuration document), while
//! `Syntax` is invalid IDL content pinned to a source line.

use std; // for error
use std::io;
use std::result;
use std::fmt::{ self, Display, Formatter };
use std::cell::{ BorrowError, BorrowMutError };
use util::{ Diagnostic, DiagnosticKind };


/// Internal helper for macros `bug!()` and `lazy_bug!()`.
/// Callers must have `Error` in scope.
macro_rules! unreachable_error {
    ($msg: expr) => {
        Error::Unreachable {
            message: $msg,
            file: file!(),
            line: line!() as usize,
        }
    }
}

/// Indicates a compiler error. Makes the current function return
/// an `Error::Unreachable`. This is basically a non-panicking
/// substitute for the standard `unreachable!()` macro.
macro_rules! bug {
    ($msg: expr) => {
        return Err(unreachable_error!($msg.to_owned()))
    };
    ($fmt: expr, $($args: tt)*) => {
        return Err(unreachable_error!(format!($fmt, $($args)*)))
    };
}

/// Similar to `bug!()`, but it yields a closure that returns an
/// `Error::Unreachable`. Useful for handling errors efficiently,
/// lazily, primarily using `Option::ok_or_else()`.
macro_rules! lazy_bug {
    ($msg: expr) => {
        || unreachable_error!($msg.to_owned())
    };
    ($fmt: expr, $($args: tt)*) => {
        || unreachable_error!(format!($fmt, $($args)*))
    };
}

/// Makes the current function return an `Error::Syntax` pinned
/// to the given source line.
macro_rules! syntax_error {
    ($line: expr, $msg: expr) => {
        return Err(Error::Syntax {
            message: $msg.to_owned(),
            line: $line,
        })
    };
    ($line: expr, $fmt: expr, $($args: tt)*) => {
        return Err(Error::Syntax {
            message: format!($fmt, $($args)*),
            line: $line,
        })
    };
}


/// An error that may occur while compiling IDL source code.
/// This can be either a user-induced error (e.g. a syntax error),
/// or an Internal Compiler Error (abbreviated ICE), i.e. a bug.
#[derive(Debug)]
pub enum Error {
    /// I/O error, probably coming from the OS, not RIDL itself.
    IO(io::Error),
    /// An immutable dynamic borrow failed. ICE.
    Borrow(BorrowError),
    /// A mutable dynamic borrow failed. ICE.
    BorrowMut(BorrowMutError),
    /// Converting a weak pointer to a strong one failed. ICE.
    Strongify,
    /// Some unreachable code was reached as a result of a bug/unforeseen condition. ICE.
    Unreachable {
        /// Description of the bug.
        message: String,
        /// Source file inside the RIDL compiler that caused the bug.
        file: &'static str,
        /// Source line index within the offending file.
        line: usize,
    },
    /// A domain error without a precise source location: a file
    /// failed to load, a configuration document was malformed,
    /// or a project was missing altogether.
    Failure {
        /// Description of the failure.
        message: String,
    },
    /// Invalid IDL content at a known source line: unexpected end
    /// of input, a malformed token, a brace mismatch, an unresolved
    /// name, or an illegal type modifier combination.
    Syntax {
        /// Description of the syntax error.
        message: String,
        /// The 1-based source line of the most recently consumed token.
        line: usize,
    },
}

/// Convenience type alias for expressing `Result`s of RIDL `Error`s.
pub type Result<T> = result::Result<T, Error>;


impl Error {
    /// Writes an error object as a nicely-formatted, user-readable
    /// error message, including the source line when one is known.
    pub fn pretty_print(&self, wr: &mut io::Write) -> io::Result<()> {
        match *self {
            Error::Syntax { line, .. } => write!(
                wr,
                "\n\n    Near line {}:\n        {}\n\n",
                Diagnostic::new(line, DiagnosticKind::Highlight),
                Diagnostic::new(self, DiagnosticKind::Error),
            ),
            _ => write!(
                wr,
                "\n\n        {}\n\n",
                Diagnostic::new(self, DiagnosticKind::Error),
            ),
        }
    }
}

impl std::error::Error for Error {
    fn description(&self) -> &str {
        match *self {
            Error::IO(ref err)        => err.description(),
            Error::Borrow(ref err)    => err.description(),
            Error::BorrowMut(ref err) => err.description(),
            Error::Strongify => "No strong pointer backing weak",
            Error::Unreachable { ref message, .. } => message,
            Error::Failure { ref message }         => message,
            Error::Syntax { ref message, .. }      => message,
        }
    }

    fn cause(&self) -> Option<&std::error::Error> {
        match *self {
            Error::IO(ref err)        => Some(err),
            Error::Borrow(ref err)    => Some(err),
            Error::BorrowMut(ref err) => Some(err),
            Error::Strongify          => None,
            Error::Unreachable { .. } => None,
            Error::Failure { .. }     => None,
            Error::Syntax { .. }      => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Error::IO(ref err) => write!(f, "I/O error: {}", err),
            Error::Borrow(ref err) => write!(
                f,
                "Internal Compiler Error: {}. This is a bug.",
                err,
            ),
            Error::BorrowMut(ref err) => write!(
                f,
                "Internal Compiler Error: {}. This is a bug.",
                err,
            ),
            Error::Strongify => write!(
                f,
                "Internal Compiler Error: No strong pointer backing weak. This is a bug.",
            ),
            Error::Unreachable { ref message, file, line } => write!(
                f,
                "Internal Compiler Error: Reached unreachable code: {}, in file {}, line {}. This is a bug.",
                message,
                file,
                line,
            ),
            Error::Failure { ref message } => write!(
                f, "Error: {}", message
            ),
            Error::Syntax { ref message, line } => write!(
                f, "Syntax Error on line {}: {}", line, message
            ),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::IO(error)
    }
}

impl From<BorrowError> for Error {
    fn from(error: BorrowError) -> Self {
        Error::Borrow(error)
    }
}

impl From<BorrowMutError> for Error {
    fn from(error: BorrowMutError) -> Self {
        Error::BorrowMut(error)
    }
}
