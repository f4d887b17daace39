use std::fs::File;
use std::io::{
    self,
    BufWriter,
    IsTerminal,
    Write,
};
use std::path::Path;
use std::time::Instant;

use tracing::{
    info,
    instrument,
};
use trailseek::{
    ElevationGrid,
    TrailReport,
    find_steepest_trails,
};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::errors::CliError;

const RESULTS_BANNER: &str = "=-=-=-=-=-=-=-=-=-=-=-=-=-=Results=-=-=-=-=-=-=-=-=-=-=-=-=-=";

/// Loads the grid, runs the search and writes the report.
#[instrument(skip(config))]
pub fn process_grid(grid_path: &Path, config: &Config) -> Result<(), CliError> {
    let st = Instant::now();
    let grid = ElevationGrid::from_path(grid_path)?;
    info!(
        "Loaded {}x{} grid from {} in {:?}",
        grid.rows(),
        grid.cols(),
        grid_path.display(),
        st.elapsed()
    );

    let options = config.resolve_options(io::stderr().is_terminal());
    let report = match config.resolve.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            info!("Using a rayon pool with {} threads", threads);
            pool.install(|| find_steepest_trails(&grid, &options))?
        }
        None => find_steepest_trails(&grid, &options)?,
    };

    match &config.output.path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_report(&report, config, &mut writer)?;
            writer.flush()?;
            info!("Wrote results to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(&report, config, &mut writer)?;
            writer.flush()?;
        }
    }

    info!("Processed time: {:?}", st.elapsed());
    Ok(())
}

fn write_report(
    report: &TrailReport,
    config: &Config,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    match config.output.format {
        OutputFormat::Text => write_text(report, config.output.max_shown, writer)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, report)?;
            writeln!(writer)?;
        }
        OutputFormat::PrettyJson => {
            serde_json::to_writer_pretty(&mut *writer, report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Renders the report the way the original command line tool printed it,
/// one numbered line per qualifying path.
pub fn write_text(
    report: &TrailReport,
    max_shown: Option<usize>,
    writer: &mut impl Write,
) -> io::Result<()> {
    for line in report.summary_lines() {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer, "{}", RESULTS_BANNER)?;
    writeln!(writer, "{}", report.results_line())?;

    let shown = max_shown.unwrap_or(report.paths.len());
    for (idx, path) in report.paths.iter().take(shown).enumerate() {
        writeln!(writer, "{} {}", idx + 1, path)?;
    }
    if shown < report.paths.len() {
        writeln!(writer, "... {} more", report.paths.len() - shown)?;
    }
    Ok(())
}
