use crate::roles::{ColumnRef, ResolvedRoles};
use crate::table::Table;
use crate::types::MaskingPolicy;

use super::SuppressionSet;

/// Mark every numeric measure cell inside the small-count range.
///
/// Returns the number of newly marked cells.
pub fn classify(
    table: &Table,
    roles: &ResolvedRoles,
    policy: &MaskingPolicy,
    suppressed: &mut SuppressionSet,
) -> usize {
    let mut columns: Vec<&ColumnRef> = roles.measures.iter().collect();
    if policy.classify_additional {
        columns.extend(roles.additional.iter());
    }

    let mut added = 0;
    for row in table.rows() {
        for column in &columns {
            let small = row
                .value(column.index)
                .as_number()
                .map_or(false, |v| policy.is_small(v));
            if small && suppressed.insert(row.id(), &column.name) {
                added += 1;
            }
        }
    }
    added
}
