#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Warning channel: categories, filters, scoped overrides and sinks.
//!
//! All channel state is per thread. A filter, sink or override installed on
//! one thread has no effect on warnings issued from another thread.

mod category;
mod error;
pub mod filter;
mod location;
mod registry;
pub mod sink;
mod warning;

pub use category::Category;
pub use error::{FilterParseError, WarningError};
pub use filter::{Action, Filter};
pub use location::SourceLocation;
pub use registry::{
    add_sink, catch_warnings, clear_sinks, default_filters, filter_warnings, filters,
    reset_filters, simple_filter, warn, warn_explicit, CatchWarnings, Recorder, SharedSink,
    FILTER_ENV_VAR,
};
pub use sink::{JsonlSink, TracingSink, WarningSink};
pub use warning::Warning;
