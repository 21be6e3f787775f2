mod explore;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

#[cfg(test)]
#[path = "../tests/src_inline/fixtures.rs"]
mod fixtures;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use crate::explore::run_explore;
use crate::input::parse_delimiter;
use crate::model::weights::WeightProfile;
use crate::pipeline::stage4_filter::ScoreRange;
use crate::pipeline::stage5_export::export_view;
use crate::pipeline::stage6_report::write_reports;
use crate::pipeline::{PipelineError, ScoredSurvey};
use crate::report::text::{
    RowLimit, count_line, range_heading, render_dataset_table, render_view_table,
};

#[derive(Debug, Parser)]
#[command(
    name = "abroad-survey",
    version,
    about = "Cleans, summarises and scores study-abroad survey responses."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full pipeline once and write reports.
    Run(RunArgs),
    /// Score once, then filter interactively from stdin.
    Explore(SourceArgs),
}

#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// Survey file (.csv, optionally .gz).
    #[arg(long)]
    input: PathBuf,
    /// Output directory for reports and exports.
    #[arg(long)]
    out: PathBuf,
    /// Abort on answers missing from the vaccination or study-status tables.
    #[arg(long)]
    strict: bool,
    #[arg(long, default_value_t = ',')]
    delimiter: char,
    /// Rows shown per console table: a count or `all`.
    #[arg(long, default_value = "all")]
    preview: RowLimit,
    /// Print the cleaned dataset before anything else.
    #[arg(long)]
    show_cleaned: bool,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Lower score bound, snapped to 0.05.
    #[arg(long, default_value_t = 0.0)]
    min: f64,
    /// Upper score bound, snapped to 0.05.
    #[arg(long, default_value_t = 1.0)]
    max: f64,
    /// Write the filtered respondents to filtered_data.csv.
    #[arg(long)]
    export: bool,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Run(args) => run_once(&args, &mut out),
        Command::Explore(args) => {
            let survey = load(&args)?;
            write_cleaned(&survey, &args, &mut out)?;
            run_explore(
                &survey,
                &args.out,
                args.preview,
                std::io::stdin().lock(),
                &mut out,
            )
        }
    }
}

fn load(args: &SourceArgs) -> Result<ScoredSurvey, PipelineError> {
    let delimiter = parse_delimiter(args.delimiter)?;
    ScoredSurvey::load(&args.input, delimiter, weight_profile(args.strict))
}

fn weight_profile(strict: bool) -> WeightProfile {
    if strict {
        WeightProfile::strict_v1()
    } else {
        WeightProfile::default_v1()
    }
}

fn write_cleaned<W: Write>(
    survey: &ScoredSurvey,
    args: &SourceArgs,
    out: &mut W,
) -> std::io::Result<()> {
    if args.show_cleaned {
        out.write_all(render_dataset_table(&survey.dataset, args.preview).as_bytes())?;
    }
    Ok(())
}

/// Runs the pipeline once. A failed export still leaves the reports written and
/// is returned afterwards.
fn run_once<W: Write>(args: &RunArgs, out: &mut W) -> Result<(), PipelineError> {
    let range = ScoreRange::snapped(args.min, args.max)?;
    let survey = load(&args.source)?;
    write_cleaned(&survey, &args.source, out)?;

    for q in &survey.insights {
        writeln!(out, "{}", q.insight)?;
    }

    let view = survey.view(range);
    if view.is_empty() {
        warn!(lo = range.lo(), hi = range.hi(), "no respondents in score range");
    }
    writeln!(out, "{}", range_heading(range.lo(), range.hi()))?;
    out.write_all(render_view_table(&view, args.source.preview).as_bytes())?;
    writeln!(out, "{}", count_line(view.len()))?;
    out.flush()?;

    let export = args.export.then(|| export_view(&view, &args.source.out));
    let exported = match &export {
        Some(Ok(path)) => Some(path.as_path()),
        Some(Err(err)) => {
            error!("export failed, writing reports without it: {err}");
            None
        }
        None => None,
    };

    let summary = survey.summary(&view, exported);
    write_reports(&summary, &args.source.out)?;
    info!(matched = view.len(), "run complete");

    match export {
        Some(Err(err)) => Err(err.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
