use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{load_config, MaskingConfig};
use crate::roles::{resolve_selectors, MeasureColumns, RelationType};
use crate::types::{Result, SumPairGate};

/// Small-cell suppression for headcount tables
#[derive(Parser, Debug)]
#[command(name = "small-cell-mask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mask small and indirectly disclosive cells in a data file
    Mask(MaskArgs),

    /// List column numbers and names of a data file
    Columns {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Worksheet name (Excel only; first sheet if omitted)
        #[arg(long)]
        sheet: Option<String>,
    },
}

/// Options of the `mask` command.
///
/// Columns may be given by header name or by 1-based column number.
#[derive(Args, Debug, Default)]
pub struct MaskArgs {
    /// Input file path (CSV, TSV or Excel)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output path; format follows its extension (defaults to <input stem>_Masked with the input format)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Worksheet name (Excel only; first sheet if omitted)
    #[arg(long)]
    pub sheet: Option<String>,

    /// JSON file with column roles and masking policy
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Partition column (repeatable)
    #[arg(short, long)]
    pub partition: Vec<String>,

    /// Subcategory column (repeatable)
    #[arg(short, long)]
    pub subcategory: Vec<String>,

    /// Measure column (repeatable; numerator or total first)
    #[arg(short, long)]
    pub measure: Vec<String>,

    /// Relation between measure columns
    #[arg(short, long, value_enum)]
    pub relation: Option<RelationType>,

    /// Additional masking column (repeatable)
    #[arg(short, long)]
    pub additional: Vec<String>,

    /// Smallest count to mask
    #[arg(long)]
    pub min: Option<f64>,

    /// Largest count to mask
    #[arg(long)]
    pub max: Option<f64>,

    /// Replacement text for masked cells
    #[arg(long)]
    pub mask_string: Option<String>,

    /// Apply the Sum pairwise check only to rows with exactly two non-zero values
    #[arg(long, default_value_t = false)]
    pub strict_sum_pair: bool,

    /// Write a JSON masking report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Include the SHA-256 of the input file in the report
    #[arg(long, default_value_t = false)]
    pub hash_file: bool,
}

impl MaskArgs {
    /// Combine the config file (if any) with command-line flags.
    ///
    /// Role flags replace the corresponding config lists; policy flags override
    /// single policy fields. `headers` resolves column numbers to names.
    pub fn masking_config(&self, headers: &[String]) -> Result<MaskingConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MaskingConfig::default(),
        };

        if !self.partition.is_empty() {
            config.roles.partition = resolve_selectors(headers, &self.partition)?;
        }
        if !self.subcategory.is_empty() {
            config.roles.subcategory = resolve_selectors(headers, &self.subcategory)?;
        }
        if !self.additional.is_empty() {
            config.roles.additional = resolve_selectors(headers, &self.additional)?;
        }

        if !self.measure.is_empty() || self.relation.is_some() {
            let relation = self
                .relation
                .unwrap_or_else(|| config.roles.measures.relation());
            let columns = if self.measure.is_empty() {
                config
                    .roles
                    .measures
                    .columns()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            } else {
                resolve_selectors(headers, &self.measure)?
            };
            config.roles.measures = MeasureColumns::from_relation(relation, columns)?;
        }

        if let Some(min) = self.min {
            config.policy.min_threshold = min;
        }
        if let Some(max) = self.max {
            config.policy.max_threshold = max;
        }
        if let Some(mask_string) = &self.mask_string {
            config.policy.sentinel = mask_string.clone();
        }
        if self.strict_sum_pair {
            config.policy.sum_pair_gate = SumPairGate::ExactlyTwo;
        }

        Ok(config)
    }
}
