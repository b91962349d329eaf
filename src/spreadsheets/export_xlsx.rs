use crate::domain::Listing;
use crate::errors::ExportError;
use crate::spreadsheets::{flatten, Cell, ExportSink, COLUMNS};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::PathBuf;

/// Writes all listings to a single-sheet workbook.
pub struct XlsxExport {
    path: PathBuf,
    sheet_name: String,
}

impl XlsxExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet_name: "classified_listings".to_string(),
        }
    }
}

impl ExportSink for XlsxExport {
    fn name(&self) -> &str {
        "xlsx"
    }

    fn export(&self, listings: &[Listing]) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| ExportError::Xlsx(format!("Failed to name sheet: {e}")))?;

        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, *header)
                .map_err(|e| {
                    ExportError::Xlsx(format!("Failed to write header '{header}': {e}"))
                })?;
        }

        for (i, listing) in listings.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in flatten(listing).into_iter().enumerate() {
                let c = col as u16;
                let written = match &cell {
                    Cell::Text(s) => worksheet.write_string(r, c, s).map(|_| ()),
                    Cell::Number(n) => worksheet.write_number(r, c, *n).map(|_| ()),
                    Cell::Empty => Ok(()),
                };
                written.map_err(|e| {
                    ExportError::Xlsx(format!(
                        "Failed to write {} for {}: {e}",
                        COLUMNS[col], listing.url
                    ))
                })?;
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        workbook
            .save(&self.path)
            .map_err(|e| ExportError::Xlsx(format!("Failed to save workbook: {e}")))?;

        tracing::info!(path = %self.path.display(), rows = listings.len(), "saved XLSX");
        Ok(())
    }
}
