use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::Error;
use crate::table::Table;
use crate::types::Result;

use super::DataReader;

/// Excel file reader (supports .xlsx, .xls, .xlsm, .xlsb)
pub struct ExcelReader {
    path: PathBuf,
    sheet: Option<String>,
}

impl ExcelReader {
    /// Read `sheet`, or the first worksheet when not given
    pub fn new(path: &Path, sheet: Option<&str>) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            sheet: sheet.map(str::to_string),
        })
    }

    /// Convert Excel Data to string representation
    fn data_to_string(dt: &Data) -> String {
        match dt {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(d) => Self::excel_serial_to_date_string(d.as_f64()),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
            Data::Error(e) => format!("#{:?}", e),
        }
    }

    /// Convert Excel serial date to ISO date string
    fn excel_serial_to_date_string(serial: f64) -> String {
        // Excel epoch is 1899-12-30 (with the 1900 leap year bug)
        let days = serial as i64;
        chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|base| base.checked_add_signed(chrono::Duration::days(days)))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| serial.to_string())
    }

    fn sheet_name(&self, workbook: &Sheets<std::io::BufReader<std::fs::File>>) -> Result<String> {
        let names = workbook.sheet_names();
        match &self.sheet {
            Some(wanted) if names.iter().any(|n| n == wanted) => Ok(wanted.clone()),
            Some(wanted) => Err(Error::InvalidInput(format!(
                "Sheet '{}' not found; available sheets: {}",
                wanted,
                names.join(", ")
            ))),
            None => names
                .first()
                .cloned()
                .ok_or_else(|| Error::InvalidInput("Workbook has no sheets".to_string())),
        }
    }
}

impl DataReader for ExcelReader {
    fn read(&mut self) -> Result<Table> {
        let mut workbook: Sheets<std::io::BufReader<std::fs::File>> =
            open_workbook_auto(&self.path)?;
        let sheet_name = self.sheet_name(&workbook)?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(Error::Excel)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    let name = Self::data_to_string(cell).trim().to_string();
                    if name.is_empty() {
                        format!("Column{}", idx + 1)
                    } else {
                        name
                    }
                })
                .collect(),
            None => return Ok(Table::default()),
        };

        let mut table = Table::new(headers)?;
        for row in rows {
            table.push_row(row.iter().map(Self::data_to_string).collect())?;
        }

        Ok(table)
    }
}
