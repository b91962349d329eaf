pub mod columns;
pub mod export_csv;
pub mod export_xlsx;

pub use columns::{flatten, Cell, COLUMNS};
pub use export_csv::CsvExport;
pub use export_xlsx::XlsxExport;

use crate::domain::Listing;
use crate::errors::ExportError;

/// Somewhere processed listings end up after a run.
pub trait ExportSink {
    fn name(&self) -> &str;
    fn export(&self, listings: &[Listing]) -> Result<(), ExportError>;
}
