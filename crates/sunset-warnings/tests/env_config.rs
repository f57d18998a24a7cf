//! Filters configured through `SUNSET_WARNINGS`.
//!
//! Lives in its own test binary: the variable is process-wide, and each
//! thread reads it the first time it touches the channel.

use std::io::Write;
use std::sync::{Arc, Mutex};

use sunset_warnings::{
    default_filters, filters, reset_filters, simple_filter, warn_explicit, Action, Category,
    Filter, SourceLocation, WarningError, FILTER_ENV_VAR,
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

#[test]
fn env_filters_precede_defaults_and_survive_reset() {
    std::env::set_var(FILTER_ENV_VAR, "error::deprecation, bogus ,always:legacy");

    std::thread::spawn(|| {
        let buf = LogBuffer::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .without_time()
            .finish();
        // First touch on this thread reads the variable.
        let initial = tracing::subscriber::with_default(subscriber, filters);

        let mut expected = vec![
            Filter::new(Action::Error).category(Category::Deprecation),
            Filter::new(Action::Always).message("legacy"),
        ];
        expected.extend(default_filters());
        assert_eq!(initial, expected);

        let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(
            logs.contains("skipping invalid warning filter"),
            "logs: {}",
            logs
        );
        assert!(logs.contains("bogus"), "logs: {}", logs);

        let err = warn_explicit("old", Category::Deprecation, SourceLocation::new("m", 1))
            .unwrap_err();
        assert!(matches!(err, WarningError::Raised(_)));

        simple_filter(Action::Ignore, None);
        reset_filters();
        assert_eq!(filters(), expected);
    })
    .join()
    .expect("env config assertions");
}
