use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::masking::MaskSummary;
use crate::roles::ColumnRoles;
use crate::types::{MaskingPolicy, Result};

/// Audit record of one masking run
#[derive(Debug, Clone, Serialize)]
pub struct MaskingReport {
    /// Report format version
    pub version: String,

    /// Input file name (without path)
    pub file_name: String,

    /// Input file hash (SHA-256)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,

    /// RFC 3339 timestamp of the run
    pub generated_at: String,

    /// Data rows in the input
    pub row_count: usize,

    pub roles: ColumnRoles,

    pub policy: MaskingPolicy,

    /// Cells masked per stage
    pub summary: MaskSummary,
}

impl MaskingReport {
    pub fn new(
        file_name: String,
        row_count: usize,
        roles: ColumnRoles,
        policy: MaskingPolicy,
        summary: MaskSummary,
    ) -> Self {
        Self {
            version: "1.0.0".to_string(),
            file_name,
            file_hash: None,
            generated_at: chrono::Utc::now().to_rfc3339(),
            row_count,
            roles,
            policy,
            summary,
        }
    }
}

/// Compute SHA-256 hash of a file (streaming to handle large files)
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::MeasureColumns;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_compute_file_hash() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "test content").unwrap();

        let hash = compute_file_hash(file.path()).unwrap();
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex chars
        assert_eq!(hash, compute_file_hash(file.path()).unwrap());
    }

    #[test]
    fn test_report_serialization() {
        let roles = ColumnRoles {
            partition: vec!["Year".to_string()],
            measures: MeasureColumns::Rate {
                numerator: "Cases".to_string(),
                denominator: "Population".to_string(),
            },
            ..ColumnRoles::default()
        };
        let summary = MaskSummary {
            threshold: 2,
            relational: 2,
            cells: 4,
            rows: 2,
            ..MaskSummary::default()
        };
        let report = MaskingReport::new(
            "counts.csv".to_string(),
            10,
            roles,
            MaskingPolicy::default(),
            summary,
        );

        let json = crate::output::to_json_string(&report).unwrap();
        assert!(json.contains("\"file_name\": \"counts.csv\""));
        assert!(json.contains("\"relation\": \"rate\""));
        assert!(json.contains("\"sentinel\": \"Msk\""));
        assert!(!json.contains("file_hash"));
    }
}
