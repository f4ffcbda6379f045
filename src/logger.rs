use crate::applier::{BatchSummary, RecordOutcome};
use crate::catalog::MetadataRecord;
use crate::cli::{OutputConfig, OutputFormat};
use crate::metadata::{TagOptions, TagReport};
use serde::Serialize;
use std::path::Path;
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Where rendered lines go.
#[derive(Clone)]
enum Sink {
    Stdout,
    #[cfg(test)]
    Capture(Arc<Mutex<Vec<String>>>),
}

#[derive(Clone)]
pub struct Logger {
    config: OutputConfig,
    sink: Sink,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Logger {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            sink: Sink::Stdout,
        }
    }

    /// A logger that collects lines instead of printing them.
    #[cfg(test)]
    pub fn capturing(config: OutputConfig) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            config,
            sink: Sink::Capture(Arc::clone(&lines)),
        };
        (logger, lines)
    }

    pub fn info(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        self.output("info", message, None);
    }

    pub fn warn(&self, message: &str) {
        self.output("warn", message, None);
    }

    pub fn debug(&self, message: &str) {
        if !self.config.verbose {
            return;
        }
        self.output("debug", message, None);
    }

    pub fn run_start(&self, base_dir: &Path, options: &TagOptions, count: usize) {
        if self.config.quiet {
            return;
        }
        let data = serde_json::json!({
            "base_dir": base_dir.display().to_string(),
            "variant": options.variant.name(),
            "mode": options.mode.name(),
            "dry_run": options.dry_run,
            "records": count
        });
        let message = format!(
            "Tagging {} files ({} fields, {} mode){}",
            count,
            options.variant.name(),
            options.mode.name(),
            if options.dry_run { ", dry run" } else { "" }
        );
        self.output("run_start", &message, Some(data));
    }

    pub fn duplicate_path(&self, path: &str) {
        let data = serde_json::json!({ "file": path });
        self.output(
            "duplicate_path",
            &format!("{} appears more than once; each record is applied in order", path),
            Some(data),
        );
    }

    pub fn file_tagged(&self, record: &MetadataRecord, report: &TagReport) {
        if self.config.quiet {
            return;
        }
        let data = serde_json::json!({
            "file": record.path,
            "title": record.title,
            "artist": record.artist,
            "album": record.album,
            "frames": report.frames,
            "cleared": report.cleared,
            "created": report.created,
            "written": report.written
        });
        let message = format!(
            "✓ {}: {} - {} ({})",
            record.path, record.title, record.artist, record.album
        );
        self.output("file_tagged", &message, Some(data));
    }

    pub fn file_missing(&self, full_path: &Path) {
        if self.config.quiet {
            return;
        }
        let data = serde_json::json!({ "file": full_path.display().to_string() });
        self.output(
            "file_missing",
            &format!("File not found: {}", full_path.display()),
            Some(data),
        );
    }

    pub fn file_failed(&self, path: &str, error: &str) {
        let data = serde_json::json!({
            "file": path,
            "error": error
        });
        self.output(
            "file_failed",
            &format!("✗ Error with {}: {}", path, error),
            Some(data),
        );
    }

    pub fn run_complete(&self, summary: &BatchSummary) {
        let mut missing_files = Vec::new();
        let mut failures = Vec::new();
        for (path, outcome) in &summary.outcomes {
            match outcome {
                RecordOutcome::Tagged(_) => {}
                RecordOutcome::Missing(full) => missing_files.push(full.display().to_string()),
                RecordOutcome::Failed(error) => {
                    failures.push(serde_json::json!({ "file": path, "error": error }))
                }
            }
        }
        let data = serde_json::json!({
            "tagged": summary.tagged,
            "missing": summary.missing,
            "failed": summary.failed,
            "missing_files": missing_files,
            "failures": failures
        });
        if self.config.output_format == OutputFormat::Text && !self.config.prefixed {
            self.emit(String::new());
        }
        self.output("run_complete", "Done!", Some(data));
        self.output(
            "info",
            &format!(
                "{} tagged, {} not found, {} failed",
                summary.tagged, summary.missing, summary.failed
            ),
            None,
        );
    }

    fn output(&self, event_type: &str, message: &str, data: Option<serde_json::Value>) {
        if let Some(line) = self.render(event_type, message, data) {
            self.emit(line);
        }
    }

    fn emit(&self, line: String) {
        match &self.sink {
            Sink::Stdout => println!("{}", line),
            #[cfg(test)]
            Sink::Capture(lines) => lines.lock().unwrap().push(line),
        }
    }

    fn render(
        &self,
        event_type: &str,
        message: &str,
        data: Option<serde_json::Value>,
    ) -> Option<String> {
        match self.config.output_format {
            OutputFormat::Json => {
                let event = JsonEvent {
                    event_type,
                    message,
                    data,
                };
                serde_json::to_string(&event).ok()
            }
            OutputFormat::Text => {
                if !self.config.prefixed {
                    return Some(message.to_string());
                }
                let prefix = match event_type {
                    "file_failed" => "[ERROR]",
                    "warn" | "duplicate_path" => "[WARN]",
                    "debug" => "[DEBUG]",
                    "file_tagged" | "run_complete" => "[OK]",
                    "file_missing" => "[SKIP]",
                    _ => "[INFO]",
                };
                Some(format!("{} {}", prefix, message))
            }
        }
    }
}
