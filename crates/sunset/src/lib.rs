#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Deprecation markers for the functions and classes of a small dynamic
//! runtime.

mod error;
mod marker;
pub mod value;

pub use error::{CallError, DeprecatedError, TypeError};
pub use marker::{deprecated, Deprecated, DEFAULT_REASON};
pub use value::{Class, Function, Instance, NativeFn, Value};

// The channel markers emit through.
pub use sunset_warnings as warnings;
