use tracing::trace;

use crate::inference::CellValue;
use crate::roles::{ColumnRef, ResolvedRelation, ResolvedRoles};
use crate::table::{Row, Table};
use crate::types::MaskingPolicy;

use super::{two_smallest, Minima, SuppressionSet};

/// Propagate suppression along the measure relation; returns the number of cells added
pub fn propagate(
    table: &Table,
    roles: &ResolvedRoles,
    policy: &MaskingPolicy,
    suppressed: &mut SuppressionSet,
) -> usize {
    match &roles.relation {
        ResolvedRelation::None => 0,
        ResolvedRelation::Rate {
            numerator,
            denominator,
        } => table
            .rows()
            .iter()
            .map(|row| propagate_rate(row, numerator, denominator, policy, suppressed))
            .sum(),
        ResolvedRelation::Sum { .. } => table
            .rows()
            .iter()
            .map(|row| propagate_sum(row, &roles.measures, policy, suppressed))
            .sum(),
    }
}

/// A rate reveals whichever of its two terms is left visible
fn propagate_rate(
    row: &Row,
    numerator: &ColumnRef,
    denominator: &ColumnRef,
    policy: &MaskingPolicy,
    suppressed: &mut SuppressionSet,
) -> usize {
    let pair = [numerator.name.as_str(), denominator.name.as_str()];

    if suppressed.contains_any(row.id(), pair) {
        return suppressed.insert_all(row.id(), pair);
    }

    let mut smallest: Option<f64> = None;
    for column in [numerator, denominator] {
        match row.value(column.index) {
            CellValue::Number(v) => {
                smallest = Some(smallest.map_or(v, |m| m.min(v)));
            }
            CellValue::Missing => {}
            CellValue::Text(_) => {
                trace!(row = %row.id(), column = %column.name, "non-numeric rate term; row skipped");
                return 0;
            }
        }
    }

    match smallest {
        Some(v) if policy.is_small(v) => suppressed.insert_all(row.id(), pair),
        _ => 0,
    }
}

/// A total with all but one of its parts visible reveals the hidden part
fn propagate_sum(
    row: &Row,
    measures: &[ColumnRef],
    policy: &MaskingPolicy,
    suppressed: &mut SuppressionSet,
) -> usize {
    let names = || measures.iter().map(|c| c.name.as_str());
    let total = &measures[0];

    if suppressed.contains(row.id(), &total.name) {
        return suppressed.insert_all(row.id(), names());
    }

    let (smallest, second) = match two_smallest(measures.iter().map(|c| row.value(c.index))) {
        Minima::Found {
            smallest,
            second,
            eligible,
        } if policy.sum_pair_gate.admits(eligible) => (smallest, second),
        Minima::NonNumeric => {
            trace!(row = %row.id(), "non-numeric sum term; row skipped");
            return 0;
        }
        _ => return 0,
    };

    let value_of = |column: &ColumnRef| row.value(column.index).as_number();
    let mut added = 0;

    if suppressed.contains_any(row.id(), names()) {
        for column in measures {
            if value_of(column) == Some(smallest) && suppressed.insert(row.id(), &column.name) {
                added += 1;
            }
        }
    }

    if smallest <= policy.max_threshold {
        for column in measures {
            let in_pair = value_of(column).map_or(false, |v| v == smallest || v == second);
            if in_pair && suppressed.insert(row.id(), &column.name) {
                added += 1;
            }
        }
    }

    added
}
