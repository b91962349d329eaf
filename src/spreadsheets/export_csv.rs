use crate::domain::Listing;
use crate::errors::ExportError;
use crate::spreadsheets::{flatten, ExportSink, COLUMNS};
use std::fs::{self, File};
use std::path::PathBuf;

/// Writes all listings to one CSV file, replacing it.
pub struct CsvExport {
    path: PathBuf,
}

impl CsvExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExportSink for CsvExport {
    fn name(&self) -> &str {
        "csv"
    }

    fn export(&self, listings: &[Listing]) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let mut writer = csv::WriterBuilder::new().from_writer(file);

        writer.write_record(COLUMNS)?;
        for listing in listings {
            writer.write_record(flatten(listing).iter().map(|c| c.render()))?;
        }
        writer.flush()?;

        tracing::info!(path = %self.path.display(), rows = listings.len(), "saved CSV");
        Ok(())
    }
}
