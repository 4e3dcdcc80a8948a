use clap::Parser;

use small_cell_mask::cli::{Cli, Commands};
use small_cell_mask::commands::{run_columns, run_mask};
use small_cell_mask::logging::init_logging;
use small_cell_mask::types::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mask(args) => {
            let run = run_mask(&args)?;
            eprintln!(
                "Masked {} cells in {} rows",
                run.summary.cells, run.summary.rows
            );
            eprintln!("Masked data written to: {}", run.output.display());
            if let Some(report) = run.report {
                eprintln!("Report written to: {}", report.display());
            }
        }
        Commands::Columns { input, sheet } => {
            let stdout = std::io::stdout();
            run_columns(&input, sheet.as_deref(), stdout.lock())?;
        }
    }

    Ok(())
}
