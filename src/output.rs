use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;

use crate::error::Error;
use crate::readers::detect_format;
use crate::report::MaskingReport;
use crate::table::Table;
use crate::types::{FileFormat, Result, MASKED_FILE_SUFFIX};

/// Worksheet name used for Excel output
pub const MASKED_SHEET_NAME: &str = "Sheet1";

/// Default output path next to the input: `<stem>_Masked.csv`, `.tsv` for
/// tab-separated input and `.xlsx` for Excel input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = match detect_format(input) {
        Ok(FileFormat::Excel) => "xlsx",
        Ok(FileFormat::Tsv) => "tsv",
        _ => "csv",
    };
    input.with_file_name(format!("{}{}.{}", stem, MASKED_FILE_SUFFIX, ext))
}

/// Write a table in the format implied by the extension of `path`
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    match detect_format(path)? {
        FileFormat::Csv => write_csv_file(table, path),
        FileFormat::Tsv => {
            let file = std::fs::File::create(path)?;
            write_delimited(table, std::io::BufWriter::new(file), b'\t')
        }
        FileFormat::Excel => write_excel_file(table, path),
    }
}

/// Write a table as CSV to any writer
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    write_delimited(table, writer, b',')
}

fn write_delimited<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a table to a CSV file
pub fn write_csv_file(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(table, std::io::BufWriter::new(file))
}

/// Write a table to a single-sheet `.xlsx` workbook
///
/// Cells whose text is a plain number are stored as numbers so they read back
/// unchanged; everything else, including the mask string, is stored as text.
pub fn write_excel_file(table: &Table, path: &Path) -> Result<()> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        return Err(Error::UnsupportedFormat(format!(
            "Excel output must use the .xlsx extension: {}",
            path.display()
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(MASKED_SHEET_NAME)?;

    for (col, name) in table.columns().iter().enumerate() {
        if !name.is_empty() {
            worksheet.write_string(0, excel_col(col)?, name.as_str())?;
        }
    }
    for (idx, row) in table.rows().iter().enumerate() {
        let excel_row = u32::try_from(idx + 1)
            .map_err(|_| Error::InvalidInput("too many rows for an Excel sheet".to_string()))?;
        for (col, cell) in row.cells().iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match plain_number(cell) {
                Some(n) => worksheet.write_number(excel_row, excel_col(col)?, n)?,
                None => worksheet.write_string(excel_row, excel_col(col)?, cell.as_str())?,
            };
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn excel_col(idx: usize) -> Result<u16> {
    u16::try_from(idx)
        .map_err(|_| Error::InvalidInput("too many columns for an Excel sheet".to_string()))
}

/// Number whose default rendering is exactly `text`
fn plain_number(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.to_string() == text)
}

/// Write report to JSON string
pub fn to_json_string(report: &MaskingReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write report to JSON file
pub fn write_json_file(report: &MaskingReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
