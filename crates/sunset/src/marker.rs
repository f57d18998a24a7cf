//! Deprecation markers.
//!
//! [`deprecated`] refuses every call. [`Deprecated`] warns through the
//! `sunset_warnings` channel and then forwards the call unchanged.

use sunset_warnings::{
    catch_warnings, simple_filter, warn_explicit, Action, Category, SourceLocation, WarningError,
};

use crate::error::{DeprecatedError, TypeError};
use crate::value::{Class, Function, Value};

/// Reason used when none (or an empty one) is given.
pub const DEFAULT_REASON: &str = "Reason for deprecation was not given";

/// Replace `func` with a function that fails with [`DeprecatedError`] on
/// every call. The original body never runs.
pub fn deprecated(func: Function) -> Function {
    let name = func.name().to_string();
    tracing::debug!(target: "sunset", function = %name, "marked as deprecated; calls will fail");
    Function::wrapping(&func, move |_args| {
        Err(DeprecatedError { name: name.clone() }.into())
    })
}

/// Message and location computed once when a value is marked.
#[derive(Debug, Clone)]
struct Notice {
    message: String,
    location: SourceLocation,
}

impl Notice {
    /// Emit one deprecation warning, shown even if deprecations are
    /// filtered out. The previous filters are back in place on return.
    fn emit(&self) -> Result<(), WarningError> {
        let _guard = catch_warnings();
        simple_filter(Action::Always, Some(Category::Deprecation));
        warn_explicit(
            self.message.clone(),
            Category::Deprecation,
            self.location.clone(),
        )
    }
}

/// Marks functions and classes as deprecated with a reason.
///
/// ```ignore
/// let foo = Deprecated::with_reason("use bar() instead").apply(foo)?;
/// foo.call(&[Value::Int(5)])?; // warns, then runs foo
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecated {
    reason: String,
}

impl Default for Deprecated {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Option<&str>> for Deprecated {
    fn from(reason: Option<&str>) -> Self {
        match reason {
            Some(r) => Self::with_reason(r),
            None => Self::new(),
        }
    }
}

impl Deprecated {
    pub fn new() -> Self {
        Self {
            reason: DEFAULT_REASON.to_string(),
        }
    }

    /// An empty reason counts as no reason.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.is_empty() {
            return Self::new();
        }
        Self { reason }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Mark a function or class. Any other value is rejected here, before
    /// anything gets called.
    pub fn apply(&self, target: Value) -> Result<Value, TypeError> {
        match target {
            Value::Function(func) => Ok(Value::Function(self.apply_function(func))),
            Value::Class(class) => Ok(Value::Function(self.apply_class(class))),
            other => Err(TypeError {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    /// The warning points at the line after the function's definition.
    pub fn apply_function(&self, func: Function) -> Function {
        let notice = Notice {
            message: format!(
                "{} is a deprecated function! ({}).",
                func.name(),
                self.reason
            ),
            location: func.location().offset(1),
        };
        tracing::debug!(target: "sunset", function = func.name(), reason = %self.reason, "marked as deprecated");

        let original = func.clone();
        Function::wrapping(&func, move |args| {
            notice.emit()?;
            original.call(args)
        })
    }

    /// The result is a constructor function named after the class. The
    /// warning is attributed to the class's module, line 1.
    pub fn apply_class(&self, class: Class) -> Function {
        let notice = Notice {
            message: format!("{} is a deprecated class! ({}).", class.name, self.reason),
            location: SourceLocation::new(class.module.clone(), 1),
        };
        tracing::debug!(target: "sunset", class = %class.name, reason = %self.reason, "marked as deprecated");

        let mut constructor = Function::at(
            class.name.clone(),
            notice.location.clone(),
            {
                let class = class.clone();
                move |args| {
                    notice.emit()?;
                    class.construct(args)
                }
            },
        );
        if let Some(doc) = &class.doc {
            constructor = constructor.with_doc(doc.clone());
        }
        constructor.with_wrapped(Value::Class(class))
    }

    /// Wrap a plain Rust closure. The warning points at the call site of
    /// `wrap`; multiple arguments go in as a tuple.
    #[track_caller]
    pub fn wrap<A, R>(&self, name: &str, f: impl Fn(A) -> R) -> impl Fn(A) -> R {
        let notice = Notice {
            message: format!("{} is a deprecated function! ({}).", name, self.reason),
            location: SourceLocation::caller(),
        };
        move |args| {
            if let Err(e) = notice.emit() {
                tracing::error!(target: "sunset", error = %e, "deprecation warning failed");
            }
            f(args)
        }
    }
}
