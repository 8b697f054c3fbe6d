//! Polymer upload pipeline
//!
//! ```text
//! settings → resolve ancestors → save empty inventory
//!          → per CSV row: upsert material, append to inventory
//!          → save populated inventory
//! ```

mod ancestors;
mod inventory;
mod mapper;
mod processor;
mod row;

use std::path::PathBuf;
use thiserror::Error;

use crate::core::client::ClientError;

pub use ancestors::{resolve_ancestors, Ancestors};
pub use inventory::resolve_inventory;
pub use mapper::{build_material, material_name, upload_polymer, ComponentNotes, PolymerNotes};
pub use processor::{
    process_file, process_reader, read_rows, upload, IngestReport, RowEvent, UploadSummary,
};
pub use row::{cell, PolymerRow, CSV_COLUMNS};

/// Errors that abort an upload
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open CSV file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to encode notes for {name}: {source}")]
    Notes {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}
