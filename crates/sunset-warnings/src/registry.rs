//! Per-thread warning state: the filter list, the "already shown" registry
//! and the installed sinks.
//!
//! The state is thread-local: filters, sinks and overrides set on one
//! thread do not apply on any other thread, and each thread reads
//! `SUNSET_WARNINGS` itself the first time it touches the channel.
//! Runtimes built on this crate are single-threaded.

use std::cell::RefCell;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::category::Category;
use crate::error::WarningError;
use crate::filter::{Action, Filter};
use crate::location::SourceLocation;
use crate::sink::{TracingSink, WarningSink};
use crate::warning::Warning;

/// Environment variable holding extra filters, e.g. `always::deprecation`.
pub const FILTER_ENV_VAR: &str = "SUNSET_WARNINGS";

pub type SharedSink = Rc<RefCell<dyn WarningSink>>;

#[derive(Hash, PartialEq, Eq)]
enum SeenKey {
    Line(String, Category, String, u32),
    Module(String, Category, String),
    Once(String, Category),
}

struct WarningState {
    /// Filters read from the environment; they stay ahead of the defaults.
    env_filters: Vec<Filter>,
    filters: Vec<Filter>,
    seen: HashSet<SeenKey>,
    sinks: Vec<SharedSink>,
}

impl WarningState {
    fn from_env() -> Self {
        let env_filters = env_filters();
        Self {
            filters: initial_filters(&env_filters),
            env_filters,
            seen: HashSet::new(),
            sinks: Vec::new(),
        }
    }

    fn action_for(&self, warning: &Warning) -> Action {
        self.filters
            .iter()
            .find(|f| f.matches(warning))
            .map(|f| f.action)
            .unwrap_or(Action::Default)
    }

    /// Returns true if the warning should reach the sinks.
    fn decide(&mut self, warning: &Warning) -> Result<bool, WarningError> {
        let msg = || warning.message.clone();
        let file = || warning.location.file.clone();
        let key = match self.action_for(warning) {
            Action::Ignore => return Ok(false),
            Action::Error => return Err(WarningError::Raised(warning.clone())),
            Action::Always => return Ok(true),
            Action::Default => {
                SeenKey::Line(msg(), warning.category, file(), warning.location.line)
            }
            Action::Module => SeenKey::Module(msg(), warning.category, file()),
            Action::Once => SeenKey::Once(msg(), warning.category),
        };
        Ok(self.seen.insert(key))
    }
}

fn env_filters() -> Vec<Filter> {
    let mut filters = Vec::new();
    if let Ok(spec) = std::env::var(FILTER_ENV_VAR) {
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.parse::<Filter>() {
                Ok(f) => filters.push(f),
                Err(e) => tracing::warn!(
                    target: "sunset::warnings",
                    var = FILTER_ENV_VAR,
                    "skipping invalid warning filter: {}",
                    e
                ),
            }
        }
    }
    filters
}

fn initial_filters(env_filters: &[Filter]) -> Vec<Filter> {
    let mut filters = env_filters.to_vec();
    filters.extend(default_filters());
    filters
}

thread_local! {
    static STATE: RefCell<WarningState> = RefCell::new(WarningState::from_env());
}

/// Filters in effect before any configuration: pending and regular
/// deprecations are hidden.
pub fn default_filters() -> Vec<Filter> {
    vec![
        Filter::new(Action::Ignore).category(Category::Deprecation),
        Filter::new(Action::Ignore).category(Category::PendingDeprecation),
    ]
}

/// Issue a warning attributed to an explicit location.
///
/// Returns an error only when an `error` filter matches. Sink failures are
/// logged and swallowed.
pub fn warn_explicit(
    message: impl Into<String>,
    category: Category,
    location: SourceLocation,
) -> Result<(), WarningError> {
    let warning = Warning::new(message, category, location);

    let sinks = STATE.with(|s| -> Result<Option<Vec<SharedSink>>, WarningError> {
        let mut state = s.borrow_mut();
        if state.decide(&warning)? {
            Ok(Some(state.sinks.clone()))
        } else {
            Ok(None)
        }
    })?;

    if let Some(sinks) = sinks {
        show(&warning, &sinks);
    }
    Ok(())
}

/// Issue a warning attributed to the caller.
#[track_caller]
pub fn warn(message: impl Into<String>, category: Category) -> Result<(), WarningError> {
    warn_explicit(message, category, SourceLocation::caller())
}

fn show(warning: &Warning, sinks: &[SharedSink]) {
    if sinks.is_empty() {
        let _ = TracingSink.show(warning);
        return;
    }
    for sink in sinks {
        let result = match sink.try_borrow_mut() {
            Ok(mut sink) => sink.show(warning),
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "sink is already showing a warning",
            )),
        };
        if let Err(e) = result {
            tracing::error!(target: "sunset::warnings", error = %e, "failed to show warning");
        }
    }
}

/// Insert `action` for `category` (or every category) at the front of the
/// filter list. An identical entry further down is removed.
pub fn simple_filter(action: Action, category: Option<Category>) {
    let mut filter = Filter::new(action);
    filter.category = category;
    filter_warnings(filter);
}

/// Insert a filter at the front of the filter list.
pub fn filter_warnings(filter: Filter) {
    STATE.with(|s| {
        let mut state = s.borrow_mut();
        state.filters.retain(|f| *f != filter);
        state.filters.insert(0, filter);
    });
}

/// Restore the initial filter list (filters from `SUNSET_WARNINGS`, then
/// the defaults) and forget which warnings were shown.
pub fn reset_filters() {
    STATE.with(|s| {
        let mut state = s.borrow_mut();
        let filters = initial_filters(&state.env_filters);
        state.filters = filters;
        state.seen.clear();
    });
}

/// Snapshot of the current filter list.
pub fn filters() -> Vec<Filter> {
    STATE.with(|s| s.borrow().filters.clone())
}

/// Install an additional sink. Replaces the default tracing display.
pub fn add_sink(sink: SharedSink) {
    STATE.with(|s| s.borrow_mut().sinks.push(sink));
}

/// Remove every installed sink, falling back to the tracing display.
pub fn clear_sinks() {
    STATE.with(|s| s.borrow_mut().sinks.clear());
}

// ---------------------------------------------------------------------------
// Scoped overrides
// ---------------------------------------------------------------------------

/// Guard returned by [`catch_warnings`]. Restores the filter list and the
/// sinks that were active when it was created.
#[must_use = "the override ends when the guard is dropped"]
pub struct CatchWarnings {
    filters: Vec<Filter>,
    sinks: Vec<SharedSink>,
    _thread_bound: PhantomData<*const ()>,
}

/// Start a scoped override of the warning state.
pub fn catch_warnings() -> CatchWarnings {
    STATE.with(|s| {
        let state = s.borrow();
        CatchWarnings {
            filters: state.filters.clone(),
            sinks: state.sinks.clone(),
            _thread_bound: PhantomData,
        }
    })
}

impl CatchWarnings {
    /// Route shown warnings into memory instead of the current sinks.
    pub fn record(self) -> Recorder {
        let log = Rc::new(RefCell::new(Vec::new()));
        let capture: SharedSink = Rc::new(RefCell::new(CaptureSink(Rc::clone(&log))));
        STATE.with(|s| s.borrow_mut().sinks = vec![capture]);
        Recorder { _guard: self, log }
    }
}

impl Drop for CatchWarnings {
    fn drop(&mut self) {
        let filters = std::mem::take(&mut self.filters);
        let sinks = std::mem::take(&mut self.sinks);
        // The thread-local may already be gone during thread teardown.
        let _ = STATE.try_with(|s| {
            if let Ok(mut state) = s.try_borrow_mut() {
                state.filters = filters;
                state.sinks = sinks;
            }
        });
    }
}

struct CaptureSink(Rc<RefCell<Vec<Warning>>>);

impl WarningSink for CaptureSink {
    fn show(&mut self, warning: &Warning) -> std::io::Result<()> {
        self.0.borrow_mut().push(warning.clone());
        Ok(())
    }
}

/// Scoped override that records shown warnings.
#[must_use = "recording stops when the recorder is dropped"]
pub struct Recorder {
    _guard: CatchWarnings,
    log: Rc<RefCell<Vec<Warning>>>,
}

impl Recorder {
    pub fn warnings(&self) -> Vec<Warning> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("registry_test.rs", line)
    }

    #[test]
    fn deprecation_hidden_by_default() {
        reset_filters();
        let rec = catch_warnings().record();
        warn_explicit("old", Category::Deprecation, loc(1)).unwrap();
        assert!(rec.is_empty());
        warn_explicit("hello", Category::User, loc(1)).unwrap();
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn always_shows_every_time() {
        reset_filters();
        let rec = catch_warnings().record();
        simple_filter(Action::Always, Some(Category::Deprecation));
        for _ in 0..3 {
            warn_explicit("old", Category::Deprecation, loc(1)).unwrap();
        }
        assert_eq!(rec.len(), 3);
    }

    #[test]
    fn default_action_dedups_per_line() {
        reset_filters();
        let rec = catch_warnings().record();
        warn_explicit("dup", Category::User, loc(1)).unwrap();
        warn_explicit("dup", Category::User, loc(1)).unwrap();
        warn_explicit("dup", Category::User, loc(2)).unwrap();
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn module_and_once_dedup() {
        reset_filters();
        let rec = catch_warnings().record();
        simple_filter(Action::Module, Some(Category::Runtime));
        warn_explicit("m", Category::Runtime, loc(1)).unwrap();
        warn_explicit("m", Category::Runtime, loc(2)).unwrap();
        warn_explicit("m", Category::Runtime, SourceLocation::new("other.rs", 1)).unwrap();
        assert_eq!(rec.len(), 2);

        rec.clear();
        simple_filter(Action::Once, Some(Category::User));
        warn_explicit("o", Category::User, loc(1)).unwrap();
        warn_explicit("o", Category::User, SourceLocation::new("other.rs", 9)).unwrap();
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn error_action_raises() {
        reset_filters();
        let _guard = catch_warnings();
        simple_filter(Action::Error, None);
        let err = warn_explicit("boom", Category::User, loc(7)).unwrap_err();
        assert_eq!(err.warning().location.line, 7);
        assert_eq!(err.to_string(), "UserWarning: boom");
    }

    #[test]
    fn guard_restores_filters() {
        reset_filters();
        let before = filters();
        {
            let _guard = catch_warnings();
            simple_filter(Action::Always, None);
            simple_filter(Action::Error, Some(Category::Runtime));
            assert_eq!(filters().len(), before.len() + 2);
        }
        assert_eq!(filters(), before);
    }

    #[test]
    fn simple_filter_moves_duplicate_to_front() {
        reset_filters();
        let _guard = catch_warnings();
        simple_filter(Action::Ignore, Some(Category::Deprecation));
        let list = filters();
        assert_eq!(list.len(), default_filters().len());
        assert_eq!(list[0], Filter::new(Action::Ignore).category(Category::Deprecation));
    }

    #[test]
    fn nested_recorders_restore_outer() {
        reset_filters();
        let outer = catch_warnings().record();
        {
            let inner = catch_warnings().record();
            warn_explicit("inner", Category::User, loc(1)).unwrap();
            assert_eq!(inner.len(), 1);
        }
        warn_explicit("outer", Category::User, loc(2)).unwrap();
        let seen = outer.warnings();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "outer");
    }

    #[test]
    fn warn_uses_caller_location() {
        reset_filters();
        let rec = catch_warnings().record();
        warn("here", Category::User).unwrap();
        let w = &rec.warnings()[0];
        assert!(w.location.file.ends_with("registry.rs"));
        assert_eq!(w.location.line, line!() - 3);
    }
}
