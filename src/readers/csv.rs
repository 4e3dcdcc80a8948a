use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder};
use tracing::warn;

use crate::table::Table;
use crate::types::Result;

use super::DataReader;

/// CSV/TSV file reader
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReader {
    /// Create a new CSV reader
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b',',
        })
    }

    /// Create a new TSV reader
    pub fn new_tsv(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b'\t',
        })
    }

    fn create_reader(&self) -> Result<Reader<BufReader<File>>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Ok(csv_reader)
    }
}

impl DataReader for CsvReader {
    fn read(&mut self) -> Result<Table> {
        let mut reader = self.create_reader()?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let num_cols = headers.len();

        let mut table = Table::new(headers)?;
        let mut truncated_rows = 0usize;

        for result in reader.records() {
            let record = result?;
            if record.len() > num_cols {
                truncated_rows += 1;
            }
            let cells: Vec<String> = record
                .iter()
                .take(num_cols)
                .map(|field| field.to_string())
                .collect();
            table.push_row(cells)?;
        }

        if truncated_rows > 0 {
            warn!(
                rows = truncated_rows,
                "rows with more fields than headers were truncated"
            );
        }

        Ok(table)
    }
}
