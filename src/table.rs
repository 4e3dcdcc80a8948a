use std::fmt;

use crate::error::Error;
use crate::inference::CellValue;
use crate::types::Result;

/// Stable identifier of a row, independent of its position after reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(usize);

impl RowId {
    pub fn new(ordinal: usize) -> Self {
        Self(ordinal)
    }

    pub fn ordinal(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.0 + 1)
    }
}

/// A row of raw cell text
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    cells: Vec<String>,
}

impl Row {
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Raw text of the cell at `index`
    pub fn raw(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Interpreted value of the cell at `index`
    pub fn value(&self, index: usize) -> CellValue {
        CellValue::parse(self.raw(index))
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// In-memory table: named columns and rows of raw text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Empty table with the given header; column names must be unique
    pub fn new(columns: Vec<String>) -> Result<Self> {
        for (idx, name) in columns.iter().enumerate() {
            if columns[..idx].contains(name) {
                return Err(Error::InvalidInput(format!(
                    "Column '{}' appears more than once in the header (column {})",
                    name,
                    idx + 1
                )));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table from string-like headers and rows
    pub fn from_rows<H, R, C>(columns: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut table = Table::new(columns.into_iter().map(Into::into).collect())?;
        for row in rows {
            table.push_row(row.into_iter().map(Into::into).collect())?;
        }
        Ok(table)
    }

    /// Append a row; short rows are padded with empty cells
    pub fn push_row(&mut self, mut cells: Vec<String>) -> Result<RowId> {
        if cells.len() > self.columns.len() {
            return Err(Error::InvalidInput(format!(
                "row {} has {} cells but the table has {} columns",
                self.rows.len() + 1,
                cells.len(),
                self.columns.len()
            )));
        }
        cells.resize(self.columns.len(), String::new());

        let id = RowId::new(self.rows.len());
        self.rows.push(Row { id, cells });
        Ok(id)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(id.ordinal())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of this table with every cell passed through `render`
    pub(crate) fn map_cells<F>(&self, mut render: F) -> Table
    where
        F: FnMut(RowId, usize, &str) -> String,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                id: row.id,
                cells: row
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| render(row.id, idx, cell))
                    .collect(),
            })
            .collect();

        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}
