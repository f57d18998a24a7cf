//! Integration tests for the warning channel: sinks, overrides and
//! the default tracing display.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use sunset_warnings::{
    add_sink, catch_warnings, clear_sinks, reset_filters, simple_filter, warn_explicit, Action,
    Category, JsonlSink, SourceLocation,
};

/// Shared buffer the fmt subscriber writes into.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a fmt subscriber scoped to this thread; return its output.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .without_time()
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    (out, logs)
}

fn here(line: u32) -> SourceLocation {
    SourceLocation::new("channel.rs", line)
}

#[test]
fn jsonl_sink_collects_shown_warnings() {
    reset_filters();
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("out.jsonl");
    let file = std::fs::File::create(&path).expect("create file");
    let sink = Rc::new(RefCell::new(JsonlSink::new(Box::new(file)).expect("header")));

    {
        let _guard = catch_warnings();
        add_sink(sink.clone());
        simple_filter(Action::Always, Some(Category::Deprecation));
        warn_explicit("first", Category::Deprecation, here(1)).unwrap();
        warn_explicit("second", Category::Deprecation, here(2)).unwrap();
        warn_explicit("pending", Category::PendingDeprecation, here(3)).unwrap();
    }
    sink.borrow_mut().finalize().expect("finalize");

    let content = std::fs::read_to_string(&path).expect("read back");
    let warnings = JsonlSink::read_warnings(&content).expect("parse");
    let messages: Vec<_> = warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages, ["first", "second"]);
    assert!(content.lines().last().unwrap().contains("\"warning_count\":2"));
}

#[test]
fn sinks_removed_when_guard_drops() {
    reset_filters();
    clear_sinks();
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("scoped.jsonl");
    let file = std::fs::File::create(&path).expect("create file");
    let sink = Rc::new(RefCell::new(JsonlSink::new(Box::new(file)).expect("header")));

    {
        let _guard = catch_warnings();
        add_sink(sink.clone());
        warn_explicit("inside", Category::User, here(10)).unwrap();
    }
    warn_explicit("outside", Category::User, here(11)).unwrap();

    assert_eq!(sink.borrow().count(), 1);
}

#[test]
fn default_display_goes_through_tracing() {
    reset_filters();
    clear_sinks();
    let ((), logs) = capture_logs(|| {
        warn_explicit("shown via tracing", Category::Runtime, here(20)).unwrap();
    });

    let line = logs
        .lines()
        .find(|l| l.contains("shown via tracing"))
        .unwrap_or_else(|| panic!("no warning event in: {}", logs));
    assert!(line.contains("WARN"), "{}", line);
    assert!(line.contains("sunset::warnings:"), "{}", line);
    assert!(line.contains("category=RuntimeWarning"), "{}", line);
    assert!(line.contains("file=channel.rs"), "{}", line);
    assert!(line.contains("line=20"), "{}", line);
}

#[test]
fn installed_sink_replaces_tracing_display() {
    reset_filters();
    let _guard = catch_warnings();
    let sink = Rc::new(RefCell::new(
        JsonlSink::new(Box::new(std::io::sink())).expect("header"),
    ));
    add_sink(sink.clone());
    let ((), logs) = capture_logs(|| {
        warn_explicit("only in jsonl", Category::User, here(21)).unwrap();
    });
    assert_eq!(sink.borrow().count(), 1);
    assert!(!logs.contains("only in jsonl"), "{}", logs);
}

#[test]
fn recorder_captures_in_order() {
    reset_filters();
    let rec = catch_warnings().record();
    for (i, msg) in ["a", "b", "c"].iter().enumerate() {
        warn_explicit(*msg, Category::User, here(30 + i as u32)).unwrap();
    }
    let lines: Vec<_> = rec.warnings().iter().map(|w| w.location.line).collect();
    assert_eq!(lines, [30, 31, 32]);
}
