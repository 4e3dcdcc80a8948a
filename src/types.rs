use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::inference::{is_missing, parse_numeric};

/// Smallest count considered small by default
pub const DEFAULT_MIN_THRESHOLD: f64 = 1.0;

/// Largest count considered small by default
pub const DEFAULT_MAX_THRESHOLD: f64 = 9.0;

/// Default replacement text for suppressed cells
pub const DEFAULT_SENTINEL: &str = "Msk";

/// Suffix appended to the input file stem for the masked output
pub const MASKED_FILE_SUFFIX: &str = "_Masked";

/// How many non-zero values a Sum row needs before the pairwise check applies
///
/// The documented masking rule reads as a gate on exactly two non-zero
/// values. The default is broader: the check runs whenever at least two
/// non-zero values exist, so rows with three or more parts are checked too.
/// Choose [`SumPairGate::ExactlyTwo`] (`--strict-sum-pair`, or
/// `"sum_pair_gate": "exactly_two"` in a config file) for the narrow gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SumPairGate {
    /// Two or more non-zero measure values in the row
    #[default]
    AtLeastTwo,
    /// Exactly two non-zero measure values in the row
    ExactlyTwo,
}

impl SumPairGate {
    pub fn admits(self, eligible: usize) -> bool {
        match self {
            SumPairGate::AtLeastTwo => eligible >= 2,
            SumPairGate::ExactlyTwo => eligible == 2,
        }
    }
}

/// Masking policy: what counts as small and what replaces it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingPolicy {
    /// Lower bound of the small-count range (inclusive)
    pub min_threshold: f64,

    /// Upper bound of the small-count range (inclusive)
    pub max_threshold: f64,

    /// Text written in place of suppressed cells
    pub sentinel: String,

    /// Gate for the pairwise minimum check under a Sum relation
    pub sum_pair_gate: SumPairGate,

    /// Also run the threshold check on additional masking columns
    pub classify_additional: bool,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self {
            min_threshold: DEFAULT_MIN_THRESHOLD,
            max_threshold: DEFAULT_MAX_THRESHOLD,
            sentinel: DEFAULT_SENTINEL.to_string(),
            sum_pair_gate: SumPairGate::default(),
            classify_additional: false,
        }
    }
}

impl MaskingPolicy {
    /// Whether `value` falls inside the closed small-count range
    pub fn is_small(&self, value: f64) -> bool {
        value >= self.min_threshold && value <= self.max_threshold
    }

    /// Reject policies that would mask inconsistently or produce ambiguous output
    pub fn validate(&self) -> Result<()> {
        if !self.min_threshold.is_finite() || !self.max_threshold.is_finite() {
            return Err(Error::InvalidPolicy(
                "thresholds must be finite numbers".to_string(),
            ));
        }
        if self.min_threshold > self.max_threshold {
            return Err(Error::InvalidPolicy(format!(
                "minimum threshold {} exceeds maximum threshold {}",
                self.min_threshold, self.max_threshold
            )));
        }
        if self.sentinel.trim().is_empty() {
            return Err(Error::InvalidPolicy("mask string is empty".to_string()));
        }
        // A numeric or missing-looking sentinel could not be told apart from real data
        if parse_numeric(&self.sentinel).is_some() || is_missing(&self.sentinel) {
            return Err(Error::InvalidPolicy(format!(
                "mask string '{}' collides with a data value",
                self.sentinel
            )));
        }
        Ok(())
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" => Some(FileFormat::Excel),
            _ => None,
        }
    }
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_range() {
        let policy = MaskingPolicy::default();
        assert!(policy.is_small(1.0));
        assert!(policy.is_small(9.0));
        assert!(!policy.is_small(0.0));
        assert!(!policy.is_small(10.0));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let policy = MaskingPolicy {
            min_threshold: 10.0,
            max_threshold: 5.0,
            ..MaskingPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(Error::InvalidPolicy(_))));
    }

    #[test]
    fn test_numeric_sentinel_rejected() {
        let policy = MaskingPolicy {
            sentinel: "0".to_string(),
            ..MaskingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = MaskingPolicy {
            sentinel: "NA".to_string(),
            ..MaskingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_sum_pair_gate() {
        assert_eq!(MaskingPolicy::default().sum_pair_gate, SumPairGate::AtLeastTwo);
        assert!(SumPairGate::AtLeastTwo.admits(2));
        assert!(SumPairGate::AtLeastTwo.admits(3));
        assert!(!SumPairGate::AtLeastTwo.admits(1));
        assert!(SumPairGate::ExactlyTwo.admits(2));
        assert!(!SumPairGate::ExactlyTwo.admits(3));
    }

    #[test]
    fn test_file_format_from_extension() {
        assert_eq!(FileFormat::from_extension("CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("tab"), Some(FileFormat::Tsv));
        assert_eq!(FileFormat::from_extension("xlsx"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_extension("sav"), None);
    }
}
