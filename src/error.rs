use thiserror::Error;

use crate::roles::Role;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Column '{0}' does not exist in the table")]
    UnknownColumn(String),

    #[error("Column '{column}' is listed more than once as a {role} column")]
    DuplicateColumn { column: String, role: Role },

    #[error("Column '{column}' is assigned to both the {first} and {second} roles")]
    OverlappingRoles {
        column: String,
        first: Role,
        second: Role,
    },

    #[error("{relation} relation requires {expected} measure columns, found {found}")]
    RelationArity {
        relation: String,
        expected: String,
        found: usize,
    },

    #[error("Invalid masking policy: {0}")]
    InvalidPolicy(String),
}
