use std::path::{Path, PathBuf};

use crate::{
    catalog::MetadataRecord,
    error_log::{ErrorLogManager, TagErrorEntry},
    logger::Logger,
    metadata::{self, TagOptions, TagReport},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Tagged(TagReport),
    /// The resolved path did not exist; nothing was touched.
    Missing(PathBuf),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub tagged: usize,
    pub missing: usize,
    pub failed: usize,
    /// One entry per record, in table order.
    pub outcomes: Vec<(&'static str, RecordOutcome)>,
}

impl BatchSummary {
    fn push(&mut self, path: &'static str, outcome: RecordOutcome) {
        match &outcome {
            RecordOutcome::Tagged(_) => self.tagged += 1,
            RecordOutcome::Missing(_) => self.missing += 1,
            RecordOutcome::Failed(_) => self.failed += 1,
        }
        self.outcomes.push((path, outcome));
    }
}

/// Walks a record table and stamps each existing file in turn.
pub struct TagApplier {
    base_dir: PathBuf,
    options: TagOptions,
    logger: Logger,
    error_log: Option<ErrorLogManager>,
}

impl TagApplier {
    pub fn new(base_dir: &Path, options: TagOptions, logger: Logger) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            options,
            logger,
            error_log: None,
        }
    }

    pub fn with_error_log(mut self, error_log: ErrorLogManager) -> Self {
        self.error_log = Some(error_log);
        self
    }

    pub fn error_log(&self) -> Option<&ErrorLogManager> {
        self.error_log.as_ref()
    }

    /// Process every record. Never stops early: missing files are skipped
    /// and per-file failures are reported, then the next record runs.
    pub fn run(&self, records: &[MetadataRecord]) -> BatchSummary {
        self.logger.run_start(&self.base_dir, &self.options, records.len());

        let mut summary = BatchSummary::default();
        for record in records {
            let outcome = self.apply_one(record);
            summary.push(record.path, outcome);
        }
        summary
    }

    pub fn apply_one(&self, record: &MetadataRecord) -> RecordOutcome {
        let full_path = self.base_dir.join(record.path);

        if !full_path.exists() {
            self.logger.file_missing(&full_path);
            return RecordOutcome::Missing(full_path);
        }

        self.logger.debug(&format!(
            "{} -> {} ({} mode)",
            record.path,
            full_path.display(),
            self.options.mode.name()
        ));

        match metadata::tag_file(&full_path, record, &self.options) {
            Ok(report) => {
                self.logger.debug(&format!(
                    "{}: {} frame(s) written, {} cleared{}",
                    record.path,
                    report.frames.len(),
                    report.cleared,
                    if report.created { ", new tag" } else { "" }
                ));
                self.logger.file_tagged(record, &report);
                RecordOutcome::Tagged(report)
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                self.logger.file_failed(record.path, &error_msg);
                self.record_failure(record.path, &error_msg);
                RecordOutcome::Failed(error_msg)
            }
        }
    }

    fn record_failure(&self, path: &str, error_msg: &str) {
        let Some(error_log) = &self.error_log else {
            return;
        };
        if self.options.dry_run {
            self.logger.debug(&format!("dry run: {} not added to error log", path));
            return;
        }
        let entry = TagErrorEntry::new(
            path.to_string(),
            self.options.mode.name().to_string(),
            error_msg.to_string(),
        );
        if let Err(e) = error_log.add_error(entry) {
            self.logger.warn(&format!("Could not update error log: {:#}", e));
        }
    }
}
