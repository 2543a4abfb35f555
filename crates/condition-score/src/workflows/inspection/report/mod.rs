mod export;
mod summary;
pub mod views;

pub use export::{render_csv, write_csv, ExportError};
pub use summary::InspectionReport;
