//
// util.rs
// The RIDL Compiler
//

//! The `util` module provides the small set of helpers used
//! throughout the RIDL source tree: the reference-counted,
//! dynamically borrow checked smart pointers that hold the
//! semantic object graph together, colored terminal diagnostics,
//! and the package metadata descriptor.

use std::rc::{ Rc, Weak };
use std::cell::{ RefCell, Ref, RefMut };
use std::fmt::{ self, Display, Formatter };
use error::{ Error, Result };


/// Type of a global descriptor that holds information about
/// the current version of the RIDL package (library and compiler).
/// A global instance of this struct provides user-readable version
/// information in a uniform manner throughout the code base.
#[derive(Debug, Clone, Copy)]
pub struct PackageInfo {
    /// The name of the RIDL package.
    pub name: &'static str,
    /// The version of the RIDL package.
    pub version: &'static str,
    /// The list of authors of RIDL.
    pub authors: &'static str,
    /// A short summary of this package.
    pub description: &'static str,
    /// URL of the RIDL home page.
    pub home_page: &'static str,
}

/// Holds metadata about the RIDL package as defined in the Cargo manifest.
pub static PACKAGE_INFO: PackageInfo = PackageInfo {
    name:        env!["CARGO_PKG_NAME"],
    version:     env!["CARGO_PKG_VERSION"],
    authors:     env!["CARGO_PKG_AUTHORS"],
    description: env!["CARGO_PKG_DESCRIPTION"],
    home_page:   env!["CARGO_PKG_HOMEPAGE"],
};

/// Used for distinguishing between the types of
/// diagnostic that the compiler can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// A message without any special attributes or coloring.
    Default,
    /// An informative message, eg. compilation progress or performance.
    Info,
    /// A highlighted part of a diagnostic.
    Highlight,
    /// Indicates successful compilation.
    Success,
    /// Indicates that an error occurred during compilation.
    Error,
}

/// Returns `DiagnosticKind::Default`.
impl Default for DiagnosticKind {
    fn default() -> Self {
        DiagnosticKind::Default
    }
}

/// A string which, when `Display`ed, looks pretty and colorful.
/// It is used for formatting diagnostic messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Diagnostic<T> {
    value: T,
    kind: DiagnosticKind,
}

impl<T> Diagnostic<T> {
    /// Makes a pretty-printable diagnostic that displays
    /// a given value in the specified diagnostic style.
    pub fn new(value: T, kind: DiagnosticKind) -> Self {
        Diagnostic { value, kind }
    }

    /// Consumes `self` and returns the inner value, discarding style information.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns the diagnostic kind associated with this instance.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }
}

impl<T> AsRef<T> for Diagnostic<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T> From<T> for Diagnostic<T> {
    fn from(value: T) -> Self {
        Self::new(value, DiagnosticKind::Default)
    }
}

impl<T> Display for Diagnostic<T> where T: Display {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let reset = "\x1b[0m";
        let color = match self.kind {
            DiagnosticKind::Default   => "",
            DiagnosticKind::Info      => "\x1b[1;33m",
            DiagnosticKind::Highlight => "\x1b[1;36m",
            DiagnosticKind::Success   => "\x1b[1;32m",
            DiagnosticKind::Error     => "\x1b[1;31m",
        };

        write!(f, "{}{}{}{}", reset, color, self.value, reset)
    }
}

/// A reference counted, dynamically borrow checked smart pointer.
/// Like `Rc<RefCell<T>>`, but with a more convenient interface.
/// The semantic object graph is held together by these: owners
/// hold their children via `RcCell`s, while back-references (a
/// child pointing at its parent, a typedef pointing at the type
/// it renames) are `WkCell`s so that no cycle owns itself.
#[derive(Debug)]
pub struct RcCell<T: ?Sized> {
    ptr: Rc<RefCell<T>>,
}

impl<T> RcCell<T> {
    /// Creates an `RcCell` owning the `value`.
    pub fn new(value: T) -> Self {
        RcCell {
            ptr: Rc::new(RefCell::new(value))
        }
    }

    /// Attempts to immutably borrow the pointed value.
    ///
    /// # Return value:
    ///
    /// * `Ok(Ref<T>)`, if an immutable borrow is dynamically possible.
    /// * `Err(Error::Borrow)`, if an immutable borrow is dynamically
    /// impossible, e.g. because there is an outstanding mutable loan.
    pub fn borrow(&self) -> Result<Ref<T>> {
        self.ptr.try_borrow().map_err(From::from)
    }

    /// Attempts to mutably borrow the pointed value.
    ///
    /// # Return value:
    ///
    /// * `Ok(RefMut<T>)`, if a mutable borrow is dynamically possible.
    /// * `Err(Error::BorrowMut)`, if a mutable borrow is dynamically
    /// impossible, e.g. because there is an outstanding immutable loan.
    pub fn borrow_mut(&self) -> Result<RefMut<T>> {
        self.ptr.try_borrow_mut().map_err(From::from)
    }

    /// Converts the strong pointer to a weak pointer.
    pub fn to_weak(&self) -> WkCell<T> {
        WkCell {
            ptr: Rc::downgrade(&self.ptr)
        }
    }
}

/// Clones the pointer only, such that the returned strong
/// pointer points to the same value as `self`.
impl<T> Clone for RcCell<T> {
    fn clone(&self) -> Self {
        RcCell {
            ptr: self.ptr.clone()
        }
    }
}

/// Tests equality based on pointer identity.
impl<T> PartialEq for RcCell<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ptr, &other.ptr)
    }
}

/// Tests equality based on pointer identity.
impl<T> Eq for RcCell<T> {}

/// Weak counterpart of `RcCell<T>`.
#[derive(Debug)]
pub struct WkCell<T: ?Sized> {
    ptr: Weak<RefCell<T>>,
}

impl<T> WkCell<T> {
    /// Creates a `WkCell` that doesn't refer to any value.
    /// `to_rc()` will always return an `Err` for such `WkCell`s.
    pub fn new() -> Self {
        WkCell {
            ptr: Weak::new()
        }
    }

    /// Converts a weak pointer to a strong pointer if possible.
    ///
    /// # Return value:
    ///
    /// * `Ok(RcCell<T>)` if `self` points to a still-existing value.
    /// * `Err(Error::Strongify)` if `self` pointed to a now-deallocated value.
    pub fn to_rc(&self) -> Result<RcCell<T>> {
        self.ptr.upgrade().map(|rc| RcCell { ptr: rc }).ok_or(Error::Strongify)
    }
}

/// Clones the weak pointer so that the returned result points to
/// the same value as `self` does, if any. If `self` doesn't point
/// anywhere, the clone will not be able to be strongified either.
impl<T> Clone for WkCell<T> {
    fn clone(&self) -> Self {
        WkCell {
            ptr: self.ptr.clone()
        }
    }
}

/// Creates a `WkCell` that doesn't point anywhere, just like `new()`.
///
/// (This is implemented manually because `#[derive]`ing
/// imposes the overly conservative bound `T: Default`.)
impl<T> Default for WkCell<T> {
    fn default() -> Self {
        WkCell::new()
    }
}
