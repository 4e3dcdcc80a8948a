use crate::roles::ResolvedRoles;

use super::SuppressionSet;

/// Add every additional masking column to rows that already have a masked cell
pub fn propagate(roles: &ResolvedRoles, suppressed: &mut SuppressionSet) -> usize {
    if roles.additional.is_empty() {
        return 0;
    }

    let rows: Vec<_> = suppressed.rows().collect();
    rows.into_iter()
        .map(|row| suppressed.insert_all(row, roles.additional.iter().map(|c| c.name.as_str())))
        .sum()
}
