//! Report storage API.

use crate::types::{AnalysisReport, ReportManifest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const REPORT_FILE: &str = "report.json";

/// Directory of saved reports, one subdirectory per report id.
#[derive(Clone, Debug)]
pub struct ReportStore {
    root_dir: PathBuf,
}

impl ReportStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store kept next to a document, under `.cutlist/reports`.
    pub fn for_source(document_path: &Path) -> ResultsResult<Self> {
        let document_dir = document_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "document path has no parent directory".to_string(),
            })?;
        let document_dir = if document_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            document_dir
        };
        Self::new(document_dir.join(".cutlist").join("reports"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn report_dir(&self, report_id: &str) -> ResultsResult<PathBuf> {
        let well_formed = !report_id.is_empty()
            && report_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(ResultsError::InvalidReportId(report_id.to_string()));
        }
        Ok(self.root_dir.join(report_id))
    }

    pub fn has_report(&self, report_id: &str) -> bool {
        self.report_dir(report_id)
            .map(|dir| dir.join(MANIFEST_FILE).exists() && dir.join(REPORT_FILE).exists())
            .unwrap_or(false)
    }

    pub fn save_report(
        &self,
        manifest: &ReportManifest,
        report: &AnalysisReport,
    ) -> ResultsResult<()> {
        let report_dir = self.report_dir(&manifest.report_id)?;
        fs::create_dir_all(&report_dir)?;

        let report_json = serde_json::to_string_pretty(report)?;
        fs::write(report_dir.join(REPORT_FILE), report_json)?;

        // Manifest last: its presence marks a complete entry.
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(report_dir.join(MANIFEST_FILE), manifest_json)?;

        Ok(())
    }

    pub fn load_manifest(&self, report_id: &str) -> ResultsResult<ReportManifest> {
        let manifest_path = self.report_dir(report_id)?.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(ResultsError::ReportNotFound {
                report_id: report_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_report(&self, report_id: &str) -> ResultsResult<AnalysisReport> {
        let report_path = self.report_dir(report_id)?.join(REPORT_FILE);

        if !report_path.exists() {
            return Err(ResultsError::ReportNotFound {
                report_id: report_id.to_string(),
            });
        }

        let content = fs::read_to_string(report_path)?;
        let report = serde_json::from_str(&content)?;
        Ok(report)
    }

    /// Saved reports for one source document, oldest first.
    pub fn list_reports(&self, source: &str) -> ResultsResult<Vec<ReportManifest>> {
        let mut reports = Vec::new();

        if !self.root_dir.exists() {
            return Ok(reports);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let report_id = entry.file_name().to_string_lossy().to_string();
            match self.load_manifest(&report_id) {
                Ok(manifest) if manifest.source == source => reports.push(manifest),
                _ => {}
            }
        }

        reports.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.report_id.cmp(&b.report_id))
        });
        Ok(reports)
    }

    pub fn delete_report(&self, report_id: &str) -> ResultsResult<()> {
        let report_dir = self.report_dir(report_id)?;
        if report_dir.exists() {
            fs::remove_dir_all(report_dir)?;
        }
        Ok(())
    }
}
