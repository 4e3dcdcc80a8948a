//! Complementary suppression across subcategory dimensions.
//!
//! Within each partition group, rows are regrouped by every subset of the
//! subcategory columns that leaves exactly one column out. The left-out column
//! is the dimension an adversary could subtract along (All - Male = Female),
//! so whenever a group's smallest non-zero count is small, both the smallest
//! and the second smallest counts of that group are masked.

use std::collections::HashMap;

use tracing::trace;

use crate::inference::CellValue;
use crate::roles::{ColumnRef, ResolvedRoles};
use crate::table::{Row, Table};
use crate::types::MaskingPolicy;

use super::{two_smallest, Minima, SuppressionSet};

/// Extend `suppressed` with complementary cells; returns the number added
pub fn suppress(
    table: &Table,
    roles: &ResolvedRoles,
    policy: &MaskingPolicy,
    suppressed: &mut SuppressionSet,
) -> usize {
    if roles.subcategory.is_empty() {
        return 0;
    }

    let partition: Vec<&ColumnRef> = roles.partition.iter().collect();
    let subsets = leave_one_out(&roles.subcategory);

    let mut added = 0;
    for partition_rows in group_rows(table.rows().iter(), &partition) {
        for subset in &subsets {
            for group in group_rows(partition_rows.iter().copied(), subset) {
                for measure in &roles.measures {
                    added += suppress_group(&group, measure, policy, suppressed);
                }
            }
        }
    }
    added
}

/// All subsets of `columns` with exactly one column removed, in combination order.
///
/// A single column yields one empty subset, which groups by partition alone.
fn leave_one_out(columns: &[ColumnRef]) -> Vec<Vec<&ColumnRef>> {
    (0..columns.len())
        .rev()
        .map(|skip| {
            columns
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != skip)
                .map(|(_, column)| column)
                .collect()
        })
        .collect()
}

/// Group rows by their values in `columns`, in order of first appearance.
///
/// Rows with a missing value in any grouping column belong to no group.
fn group_rows<'t, I>(rows: I, columns: &[&ColumnRef]) -> Vec<Vec<&'t Row>>
where
    I: IntoIterator<Item = &'t Row>,
{
    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'t Row>> = Vec::new();

    for row in rows {
        let Some(key) = group_key(row, columns) else {
            continue;
        };
        match positions.get(&key) {
            Some(&pos) => groups[pos].push(row),
            None => {
                positions.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}

fn group_key(row: &Row, columns: &[&ColumnRef]) -> Option<Vec<String>> {
    columns
        .iter()
        .map(|column| match row.value(column.index) {
            CellValue::Missing => None,
            _ => Some(row.raw(column.index).trim().to_string()),
        })
        .collect()
}

fn suppress_group(
    group: &[&Row],
    measure: &ColumnRef,
    policy: &MaskingPolicy,
    suppressed: &mut SuppressionSet,
) -> usize {
    match two_smallest(group.iter().map(|row| row.value(measure.index))) {
        Minima::Found {
            smallest, second, ..
        } if smallest <= policy.max_threshold => group
            .iter()
            .filter(|row| {
                row.value(measure.index)
                    .as_number()
                    .map_or(false, |v| v == smallest || v == second)
            })
            .filter(|row| suppressed.insert(row.id(), &measure.name))
            .count(),
        Minima::Found { .. } => 0,
        Minima::Insufficient => {
            trace!(column = %measure.name, rows = group.len(), "fewer than two non-zero values; group skipped");
            0
        }
        Minima::NonNumeric => {
            trace!(column = %measure.name, rows = group.len(), "non-numeric value in group; group skipped");
            0
        }
    }
}
