//! Exported rows and the CSV sink.

use crate::error::Result;
use creatorscope_core::{CandidateRecord, RoleType};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

/// Column order of every exported file.
pub const EXPORT_HEADER: [&str; 4] = ["name", "email", "profile_url", "role_type"];

/// One exported creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub name: String,
    pub email: String,
    pub profile_url: String,
    pub role_type: RoleType,
}

impl From<&CandidateRecord> for ExportRow {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            name: record.display_name.clone(),
            email: record.email.clone(),
            profile_url: record.profile_url.clone(),
            role_type: record.role_type,
        }
    }
}

/// Destination for the rows of one category.
pub trait ExportSink: Send {
    fn export(&mut self, role: RoleType, rows: &[ExportRow]) -> Result<()>;
}

/// Writes `ugc_creators.csv` and `video_editors.csv` into a directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn path_for(&self, role: RoleType) -> PathBuf {
        self.output_dir.join(role.export_file_name())
    }
}

impl ExportSink for CsvExporter {
    fn export(&mut self, role: RoleType, rows: &[ExportRow]) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(role);

        let file = File::create(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        // Header is written even for an empty export.
        writer.write_record(EXPORT_HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        tracing::info!(
            "Saved {} {} creators with emails to {}",
            rows.len(),
            role.display_name(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(name: &str, email: &str) -> ExportRow {
        ExportRow {
            name: name.to_string(),
            email: email.to_string(),
            profile_url: format!("https://collabstr.com/{}", name.to_lowercase()),
            role_type: RoleType::VideoEditor,
        }
    }

    #[test]
    fn test_row_from_record() {
        let record = CandidateRecord {
            profile_url: "https://collabstr.com/jane".to_string(),
            username: "@jane".to_string(),
            display_name: "Jane".to_string(),
            heading: "UGC".to_string(),
            email: "jane@jane.co".to_string(),
            role_type: RoleType::Ugc,
            instagram_handle: "jane".to_string(),
        };
        let row = ExportRow::from(&record);
        assert_eq!(row.name, "Jane");
        assert_eq!(row.email, "jane@jane.co");
        assert_eq!(row.role_type, RoleType::Ugc);
    }

    #[test]
    fn test_writes_category_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let mut exporter = CsvExporter::new(tmp.path().join("out"));

        exporter
            .export(
                RoleType::VideoEditor,
                &[row("Sam", "sam@cuts.io"), row("Mo", "mo@edits.tv")],
            )
            .expect("export");

        let written = fs::read_to_string(tmp.path().join("out").join("video_editors.csv"))
            .expect("read export");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "name,email,profile_url,role_type");
        assert_eq!(
            lines[1],
            "Sam,sam@cuts.io,https://collabstr.com/sam,video_editor"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_export_keeps_header() {
        let tmp = TempDir::new().expect("create temp dir");
        let mut exporter = CsvExporter::new(tmp.path());

        exporter.export(RoleType::Ugc, &[]).expect("export");

        let written = fs::read_to_string(exporter.path_for(RoleType::Ugc)).expect("read export");
        assert_eq!(written.trim_end(), "name,email,profile_url,role_type");
    }
}
