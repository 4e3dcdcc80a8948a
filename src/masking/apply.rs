use crate::table::Table;

use super::SuppressionSet;

/// Render the masked table: marked cells become `sentinel`, all others keep their text
pub fn apply_mask(table: &Table, suppressed: &SuppressionSet, sentinel: &str) -> Table {
    let columns = table.columns();
    table.map_cells(|row, idx, raw| {
        if suppressed.contains(row, &columns[idx]) {
            sentinel.to_string()
        } else {
            raw.to_string()
        }
    })
}
