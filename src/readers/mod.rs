pub mod csv;
pub mod excel;

use std::path::Path;

use crate::table::Table;
use crate::types::{FileFormat, Result};

/// Common trait for data file readers
pub trait DataReader {
    /// Read the file into an in-memory table
    fn read(&mut self) -> Result<Table>;
}

/// Detect the file format from the path's extension
pub fn detect_format(path: &Path) -> Result<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    FileFormat::from_extension(ext).ok_or_else(|| {
        crate::error::Error::UnsupportedFormat(format!(
            "Unsupported file extension: .{}",
            ext
        ))
    })
}

/// Create a reader for the given file path; `sheet` selects an Excel worksheet
pub fn create_reader(path: &Path, sheet: Option<&str>) -> Result<Box<dyn DataReader>> {
    match detect_format(path)? {
        FileFormat::Csv => Ok(Box::new(csv::CsvReader::new(path)?)),
        FileFormat::Tsv => Ok(Box::new(csv::CsvReader::new_tsv(path)?)),
        FileFormat::Excel => Ok(Box::new(excel::ExcelReader::new(path, sheet)?)),
    }
}

/// Read a table from a CSV, TSV or Excel file
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    create_reader(path, sheet)?.read()
}
