//! The masking-decision engine.
//!
//! Stages run in a fixed order over one table and one growing
//! [`SuppressionSet`]:
//!
//! 1. [`threshold`]: small numeric measure cells
//! 2. [`complementary`]: cells recoverable by subtraction across subcategories
//! 3. [`relational`]: cells recoverable through a Rate or Sum relation
//! 4. [`additional`]: additional masking columns of partially masked rows
//!
//! [`apply_mask`] then renders the output table.

pub mod additional;
pub mod apply;
pub mod complementary;
pub mod relational;
pub mod suppression;
pub mod threshold;

use serde::Serialize;
use tracing::{debug, info};

use crate::inference::CellValue;
use crate::roles::ColumnRoles;
use crate::table::Table;
use crate::types::{MaskingPolicy, Result};

pub use apply::apply_mask;
pub use suppression::SuppressionSet;

/// The two smallest non-zero values among a set of cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Minima {
    /// `smallest <= second`; `eligible` counts the non-zero numeric values seen
    Found {
        smallest: f64,
        second: f64,
        eligible: usize,
    },
    /// Fewer than two non-zero values
    Insufficient,
    /// At least one cell held text
    NonNumeric,
}

/// Find the two smallest non-zero values, ignoring missing cells
pub fn two_smallest<I>(values: I) -> Minima
where
    I: IntoIterator<Item = CellValue>,
{
    let mut smallest = f64::INFINITY;
    let mut second = f64::INFINITY;
    let mut eligible = 0;

    for value in values {
        match value {
            CellValue::Text(_) => return Minima::NonNumeric,
            CellValue::Missing => {}
            CellValue::Number(v) if v == 0.0 => {}
            CellValue::Number(v) => {
                eligible += 1;
                if v < smallest {
                    second = smallest;
                    smallest = v;
                } else if v < second {
                    second = v;
                }
            }
        }
    }

    if eligible < 2 {
        Minima::Insufficient
    } else {
        Minima::Found {
            smallest,
            second,
            eligible,
        }
    }
}

/// Cells added by each stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaskSummary {
    pub threshold: usize,
    pub complementary: usize,
    pub relational: usize,
    pub additional: usize,
    /// Total masked cells
    pub cells: usize,
    /// Rows with at least one masked cell
    pub rows: usize,
}

/// Outcome of the decision stages
#[derive(Debug, Clone)]
pub struct Suppression {
    pub cells: SuppressionSet,
    pub summary: MaskSummary,
}

/// A masked table with the decisions that produced it
#[derive(Debug, Clone)]
pub struct MaskedTable {
    pub table: Table,
    pub suppression: Suppression,
}

/// Decide which cells of `table` must be masked.
///
/// The policy and role assignment are validated first; nothing is computed if
/// either is invalid.
pub fn compute_suppression(
    table: &Table,
    roles: &ColumnRoles,
    policy: &MaskingPolicy,
) -> Result<Suppression> {
    policy.validate()?;
    let resolved = roles.resolve(table)?;

    let mut cells = SuppressionSet::new();
    let mut summary = MaskSummary::default();

    summary.threshold = threshold::classify(table, &resolved, policy, &mut cells);
    debug!(added = summary.threshold, "threshold classification");

    summary.complementary = complementary::suppress(table, &resolved, policy, &mut cells);
    debug!(added = summary.complementary, "complementary subcategory suppression");

    summary.relational = relational::propagate(table, &resolved, policy, &mut cells);
    debug!(
        added = summary.relational,
        relation = %roles.measures.relation(),
        "relational propagation"
    );

    summary.additional = additional::propagate(&resolved, &mut cells);
    debug!(added = summary.additional, "additional column propagation");

    summary.cells = cells.len();
    summary.rows = cells.row_count();
    info!(
        cells = summary.cells,
        rows = summary.rows,
        of_rows = table.len(),
        "masking decisions complete"
    );

    Ok(Suppression { cells, summary })
}

/// Decide and apply masking in one step
pub fn mask_table(table: &Table, roles: &ColumnRoles, policy: &MaskingPolicy) -> Result<MaskedTable> {
    let suppression = compute_suppression(table, roles, policy)?;
    let masked = apply_mask(table, &suppression.cells, &policy.sentinel);
    Ok(MaskedTable {
        table: masked,
        suppression,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[&str]) -> Vec<CellValue> {
        raw.iter().map(|r| CellValue::parse(r)).collect()
    }

    #[test]
    fn test_two_smallest_found() {
        assert_eq!(
            two_smallest(cells(&["10", "4", "6"])),
            Minima::Found {
                smallest: 4.0,
                second: 6.0,
                eligible: 3
            }
        );
    }

    #[test]
    fn test_two_smallest_keeps_ties() {
        assert_eq!(
            two_smallest(cells(&["5", "7", "5"])),
            Minima::Found {
                smallest: 5.0,
                second: 5.0,
                eligible: 3
            }
        );
    }

    #[test]
    fn test_two_smallest_drops_zero_and_missing() {
        assert_eq!(two_smallest(cells(&["0", "3", "NA"])), Minima::Insufficient);
        assert_eq!(
            two_smallest(cells(&["0", "3", "", "8"])),
            Minima::Found {
                smallest: 3.0,
                second: 8.0,
                eligible: 2
            }
        );
    }

    #[test]
    fn test_two_smallest_non_numeric() {
        assert_eq!(two_smallest(cells(&["3", "Msk", "8"])), Minima::NonNumeric);
    }
}
