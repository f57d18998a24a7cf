//! Where shown warnings go.
//!
//! With no sink installed, warnings are displayed through [`TracingSink`].
//! [`JsonlSink`] writes a versioned JSONL stream for log collectors:
//! 1. Header (schema version, start time)
//! 2. One record per shown warning
//! 3. Footer (warning count) once `finalize()` is called

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::warning::Warning;

/// Receives every warning the filters decided to show.
pub trait WarningSink {
    fn show(&mut self, warning: &Warning) -> std::io::Result<()>;
}

/// Displays warnings as `tracing` events at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn show(&mut self, warning: &Warning) -> std::io::Result<()> {
        tracing::warn!(
            target: "sunset::warnings",
            category = %warning.category,
            file = %warning.location.file,
            line = warning.location.line,
            "{}",
            warning.message
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSONL
// ---------------------------------------------------------------------------

/// Current JSONL schema version.
pub const WARNING_SCHEMA_VERSION: &str = "0.1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "record")]
pub enum WarningRecord {
    #[serde(rename = "header")]
    Header(WarningHeader),
    #[serde(rename = "warning")]
    Warning(WarningEntry),
    #[serde(rename = "footer")]
    Footer(WarningFooter),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WarningHeader {
    pub schema_version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WarningEntry {
    pub seq: u64,
    pub timestamp: String,
    pub warning: Warning,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WarningFooter {
    pub timestamp: String,
    pub warning_count: u64,
}

/// Writes shown warnings as JSONL records.
pub struct JsonlSink {
    seq: u64,
    writer: Box<dyn Write>,
    finalized: bool,
}

impl std::fmt::Debug for JsonlSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlSink")
            .field("seq", &self.seq)
            .field("finalized", &self.finalized)
            .finish()
    }
}

impl JsonlSink {
    /// Emits the header record immediately.
    pub fn new(mut writer: Box<dyn Write>) -> std::io::Result<Self> {
        write_record(
            &mut writer,
            &WarningRecord::Header(WarningHeader {
                schema_version: WARNING_SCHEMA_VERSION.to_string(),
                timestamp: now_rfc3339(),
            }),
        )?;
        Ok(Self {
            seq: 0,
            writer,
            finalized: false,
        })
    }

    /// Number of warning records written so far.
    pub fn count(&self) -> u64 {
        self.seq
    }

    /// Write the footer and flush. Later warnings are rejected; calling it
    /// again only retries the flush.
    pub fn finalize(&mut self) -> std::io::Result<()> {
        if self.finalized {
            return self.writer.flush();
        }
        write_record(
            &mut self.writer,
            &WarningRecord::Footer(WarningFooter {
                timestamp: now_rfc3339(),
                warning_count: self.seq,
            }),
        )?;
        self.finalized = true;
        self.writer.flush()
    }

    /// Read the warnings back out of a JSONL stream, ignoring header/footer.
    pub fn read_warnings(content: &str) -> Result<Vec<Warning>, serde_json::Error> {
        let mut out = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            if let WarningRecord::Warning(entry) = serde_json::from_str(line)? {
                out.push(entry.warning);
            }
        }
        Ok(out)
    }
}

impl WarningSink for JsonlSink {
    fn show(&mut self, warning: &Warning) -> std::io::Result<()> {
        if self.finalized {
            return Err(std::io::Error::other("warning stream already finalized"));
        }
        let seq = self.seq;
        write_record(
            &mut self.writer,
            &WarningRecord::Warning(WarningEntry {
                seq,
                timestamp: now_rfc3339(),
                warning: warning.clone(),
            }),
        )?;
        self.seq += 1;
        Ok(())
    }
}

fn write_record(w: &mut dyn Write, record: &WarningRecord) -> std::io::Result<()> {
    let json = serde_json::to_string(record)
        .map_err(std::io::Error::other)?;
    writeln!(w, "{}", json)
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
