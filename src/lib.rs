//! Small-cell suppression for tables of headcounts.
//!
//! Given a table and an assignment of its columns to roles, [`masking`]
//! decides which cells must be replaced by a sentinel so that small counts
//! cannot be read directly, recovered by subtraction across subcategories, or
//! recovered through a rate or sum relation between measure columns.
//!
//! ```
//! use small_cell_mask::masking::mask_table;
//! use small_cell_mask::roles::{ColumnRoles, MeasureColumns};
//! use small_cell_mask::table::Table;
//! use small_cell_mask::types::MaskingPolicy;
//!
//! let table = Table::from_rows(
//!     ["Year", "Gender", "Count"],
//!     vec![
//!         vec!["2023", "All", "10"],
//!         vec!["2023", "Male", "4"],
//!         vec!["2023", "Female", "6"],
//!     ],
//! )?;
//! let roles = ColumnRoles {
//!     partition: vec!["Year".to_string()],
//!     subcategory: vec!["Gender".to_string()],
//!     measures: MeasureColumns::Independent { columns: vec!["Count".to_string()] },
//!     additional: Vec::new(),
//! };
//!
//! let masked = mask_table(&table, &roles, &MaskingPolicy::default())?;
//! assert_eq!(masked.table.rows()[1].raw(2), "Msk");
//! # Ok::<(), small_cell_mask::error::Error>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod inference;
pub mod logging;
pub mod masking;
pub mod output;
pub mod readers;
pub mod report;
pub mod roles;
pub mod table;
pub mod types;
