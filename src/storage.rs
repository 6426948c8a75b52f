use crate::models::Report;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_STORE_FILE: &str = "reports.json";

/// File-backed report store. Every call reads the backing file fresh and
/// every mutation rewrites it wholesale; there is no in-memory cache and no
/// file lock, so concurrent appends can lose the earlier write.
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a report, inserts it at the head of the sequence and persists
    /// the whole sequence before returning. Write failures propagate.
    pub async fn append(&self, name: String, reason: String, date: String) -> Result<Report> {
        let mut reports = self.load();
        let report = Report::new(name, reason, date);
        reports.insert(0, report.clone());
        self.save_to_disk(&reports)?;
        Ok(report)
    }

    /// All reports, newest first.
    pub async fn list(&self) -> Vec<Report> {
        self.load()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Report> {
        self.load().into_iter().find(|r| r.id == id)
    }

    pub async fn count(&self) -> usize {
        self.load().len()
    }

    /// Reads the backing file. A missing file is the normal first-run state
    /// and yields an empty list; an unreadable or corrupt file also yields an
    /// empty list, logged at warn since callers never see the failure.
    fn load(&self) -> Vec<Report> {
        if !self.path.exists() {
            return Vec::new();
        }

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("failed to read report store, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("failed to parse report store, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save_to_disk(&self, reports: &[Report]) -> Result<()> {
        let json = serde_json::to_string_pretty(reports)
            .context("Failed to serialize reports")?;
        fs::write(&self.path, json)
            .context("Failed to write to report store")?;
        Ok(())
    }
}
