use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::MaskArgs;
use crate::error::Error;
use crate::masking::{mask_table, MaskSummary};
use crate::output;
use crate::readers::read_table;
use crate::report::{compute_file_hash, MaskingReport};
use crate::types::Result;

/// Files produced by a `mask` run
#[derive(Debug, Clone)]
pub struct MaskRun {
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    pub summary: MaskSummary,
}

/// Read the input, mask it, and write the masked CSV (and report if requested)
pub fn run_mask(args: &MaskArgs) -> Result<MaskRun> {
    let table = read_table(&args.input, args.sheet.as_deref())?;
    info!(rows = table.len(), columns = table.columns().len(), "input loaded");

    let config = args.masking_config(table.columns())?;
    let masked = mask_table(&table, &config.roles, &config.policy)?;

    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| output::default_output_path(&args.input));
    if same_file(&out_path, &args.input) {
        return Err(Error::InvalidInput(format!(
            "Output path {} would overwrite the input",
            out_path.display()
        )));
    }
    output::write_table(&masked.table, &out_path)?;

    let summary = masked.suppression.summary;

    let report_path = match &args.report {
        Some(path) => {
            let file_name = args
                .input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            let mut report = MaskingReport::new(
                file_name,
                table.len(),
                config.roles,
                config.policy,
                summary.clone(),
            );
            if args.hash_file {
                report.file_hash = Some(compute_file_hash(&args.input)?);
            }
            output::write_json_file(&report, path)?;
            Some(path.clone())
        }
        None => None,
    };

    Ok(MaskRun {
        output: out_path,
        report: report_path,
        summary,
    })
}

/// Write a numbered column listing (`1 : Year`) for choosing roles by number
pub fn run_columns<W: Write>(input: &Path, sheet: Option<&str>, mut out: W) -> Result<()> {
    let table = read_table(input, sheet)?;
    for (idx, name) in table.columns().iter().enumerate() {
        writeln!(out, "{} : {}", idx + 1, name)?;
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RelationType;
    use crate::table::Table;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("counts.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_run_mask_writes_masked_csv_and_report() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "Year,Gender,Count\n2023,All,10\n2023,Male,4\n2023,Female,6\n",
        );
        let report = dir.path().join("report.json");

        let args = MaskArgs {
            input: input.clone(),
            partition: vec!["Year".to_string()],
            subcategory: vec!["Gender".to_string()],
            measure: vec!["Count".to_string()],
            relation: Some(RelationType::None),
            report: Some(report.clone()),
            hash_file: true,
            ..MaskArgs::default()
        };

        let run = run_mask(&args).unwrap();

        assert_eq!(run.output, dir.path().join("counts_Masked.csv"));
        let masked = std::fs::read_to_string(&run.output).unwrap();
        assert_eq!(
            masked,
            "Year,Gender,Count\n2023,All,10\n2023,Male,Msk\n2023,Female,Msk\n"
        );
        assert_eq!(run.summary.threshold, 2);
        assert_eq!(run.summary.cells, 2);

        let json = std::fs::read_to_string(&report).unwrap();
        assert!(json.contains("\"file_hash\""));
        assert!(json.contains("\"complementary\": 0"));
    }

    #[test]
    fn test_run_mask_rejects_bad_roles_without_output() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "Year,Gender,Count\n2023,All,10\n");

        let args = MaskArgs {
            input,
            subcategory: vec!["Gender".to_string()],
            measure: vec!["Count".to_string(), "Gender".to_string()],
            ..MaskArgs::default()
        };

        let result = run_mask(&args);

        assert!(matches!(result, Err(Error::OverlappingRoles { .. })));
        assert!(!dir.path().join("counts_Masked.csv").exists());
    }

    #[test]
    fn test_run_mask_refuses_to_overwrite_input() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "Count\n3\n");

        let args = MaskArgs {
            input: input.clone(),
            out: Some(input.clone()),
            measure: vec!["Count".to_string()],
            ..MaskArgs::default()
        };

        assert!(matches!(run_mask(&args), Err(Error::InvalidInput(_))));
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "Count\n3\n");
    }

    #[test]
    fn test_run_mask_excel_input_writes_xlsx() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("counts.xlsx");
        let source = Table::from_rows(
            ["Year", "Gender", "Count"],
            vec![
                vec!["2023", "All", "25"],
                vec!["2023", "Male", "3"],
                vec!["2023", "Female", "22"],
            ],
        )
        .unwrap();
        output::write_excel_file(&source, &input).unwrap();

        let args = MaskArgs {
            input: input.clone(),
            partition: vec!["Year".to_string()],
            subcategory: vec!["Gender".to_string()],
            measure: vec!["Count".to_string()],
            ..MaskArgs::default()
        };

        let run = run_mask(&args).unwrap();

        assert_eq!(run.output, dir.path().join("counts_Masked.xlsx"));
        let masked = read_table(&run.output, None).unwrap();
        let counts: Vec<&str> = masked.rows().iter().map(|r| r.raw(2)).collect();
        assert_eq!(counts, vec!["25", "Msk", "Msk"]);
    }

    #[test]
    fn test_run_columns() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "Year,Gender,Count\n2023,All,10\n");

        let mut buffer = Vec::new();
        run_columns(&input, None, &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "1 : Year\n2 : Gender\n3 : Count\n"
        );
    }
}
