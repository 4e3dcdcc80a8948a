use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::roles::ColumnRoles;
use crate::types::{MaskingPolicy, Result};

/// Role assignment and policy loaded from a JSON file.
///
/// ```json
/// {
///   "partition": ["Year"],
///   "subcategory": ["Gender"],
///   "measures": { "relation": "sum", "total": "All", "elements": ["A", "B"] },
///   "additional": ["Rate"],
///   "policy": { "max_threshold": 9, "sentinel": "Msk" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskingConfig {
    #[serde(flatten)]
    pub roles: ColumnRoles,

    #[serde(default)]
    pub policy: MaskingPolicy,
}

/// Load a masking configuration from a JSON file
pub fn load_config(path: &Path) -> Result<MaskingConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
