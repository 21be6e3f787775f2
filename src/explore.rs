use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::pipeline::stage4_filter::{FilteredView, ScoreRange};
use crate::pipeline::stage5_export::export_view;
use crate::pipeline::{PipelineError, ScoredSurvey};
use crate::report::format_f64_6;
use crate::report::text::{RowLimit, count_line, range_heading, render_view_table};

const HELP: &str = "commands:\n  <lo> <hi>  set the score range (0.0-1.0, step 0.05)\n  export     write the current view to filtered_data.csv\n  summary    print the score summary\n  help       show this message\n  quit       end the session\n";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExploreCommand {
    Range(ScoreRange),
    Export,
    Summary,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ExploreCommand>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let cmd = match parts.as_slice() {
        [] => return Ok(None),
        ["export"] => ExploreCommand::Export,
        ["summary"] => ExploreCommand::Summary,
        ["help"] => ExploreCommand::Help,
        ["quit"] | ["exit"] => ExploreCommand::Quit,
        [lo, hi] => {
            let lo: f64 = lo.parse().map_err(|_| format!("invalid lower bound: {lo}"))?;
            let hi: f64 = hi.parse().map_err(|_| format!("invalid upper bound: {hi}"))?;
            ExploreCommand::Range(ScoreRange::snapped(lo, hi).map_err(|e| e.to_string())?)
        }
        _ => return Err(format!("unknown command: {}", line.trim())),
    };
    Ok(Some(cmd))
}

/// Drives a session over `input`. Only the filter runs per range change; the
/// scored survey is reused as is, and a narrower range refines the current
/// view. Export failures are reported and the session continues.
pub fn run_explore<R: BufRead, W: Write>(
    survey: &ScoredSurvey,
    out_dir: &Path,
    preview: RowLimit,
    input: R,
    output: &mut W,
) -> Result<(), PipelineError> {
    let mut view = survey.view(ScoreRange::full());
    write_view(&view, preview, output)?;
    output.write_all(HELP.as_bytes())?;

    for line in input.lines() {
        let line = line?;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(output, "error: {msg}")?;
                continue;
            }
        };
        match cmd {
            ExploreCommand::Range(range) => {
                view = if range.is_within(view.range()) {
                    view.refine(range)
                } else {
                    survey.view(range)
                };
                write_view(&view, preview, output)?;
            }
            ExploreCommand::Export => match export_view(&view, out_dir) {
                Ok(path) => writeln!(
                    output,
                    "Exported {} respondents to {}",
                    view.len(),
                    path.display()
                )?,
                Err(err) => {
                    warn!("{err}");
                    writeln!(output, "error: {err}")?;
                }
            },
            ExploreCommand::Summary => {
                let summary = survey.summary(&view, None);
                let s = &summary.scores;
                writeln!(
                    output,
                    "scored={} undefined={} median={} mean={}",
                    s.n_scored,
                    s.n_unscored,
                    s.median.map(format_f64_6).unwrap_or_else(|| "-".to_string()),
                    s.mean.map(format_f64_6).unwrap_or_else(|| "-".to_string())
                )?;
            }
            ExploreCommand::Help => output.write_all(HELP.as_bytes())?,
            ExploreCommand::Quit => break,
        }
    }

    info!("explore session ended");
    Ok(())
}

fn write_view<W: Write>(
    view: &FilteredView<'_>,
    preview: RowLimit,
    output: &mut W,
) -> std::io::Result<()> {
    let range = view.range();
    writeln!(output, "{}", range_heading(range.lo(), range.hi()))?;
    output.write_all(render_view_table(view, preview).as_bytes())?;
    writeln!(output, "{}", count_line(view.len()))?;
    output.flush()
}

#[cfg(test)]
#[path = "../tests/src_inline/explore.rs"]
mod tests;
