use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use tracing::{debug, info, warn};

use crate::config::RunSettings;
use crate::engine::SimulationEngine;
use crate::error::{Error, Result, RC_INVALID_CONTENT};
use crate::events::{InputStream, TickInput};
use crate::models::{CostLinePolicy, OutputFormat};
use crate::output::{formatter_for, RunSummary};

/// Reads the input file named in `settings`, simulates every tick and
/// writes the result to the output file.
///
/// Parameters are validated before the output file is created, so a
/// configuration error leaves no output behind. A malformed tick line
/// stops the run with [`Error::InvalidContent`] after the rows written so
/// far (and, depending on the cost line policy, the cost) are flushed.
pub fn load_balance(settings: &RunSettings) -> Result<RunSummary> {
    let input_path = &settings.input;
    if !input_path.is_file() {
        return Err(Error::InputFileMissing(input_path.clone()));
    }
    let file = File::open(input_path).map_err(|source| Error::InputRead {
        path: input_path.clone(),
        source,
    })?;

    let output_path = &settings.output;
    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        format = %settings.format,
        cost_line = %settings.cost_line,
        "starting run"
    );
    run_stream(
        BufReader::new(file),
        || {
            File::create(output_path)
                .map(BufWriter::new)
                .map_err(|source| Error::OutputCreate {
                    path: output_path.clone(),
                    source,
                })
        },
        settings.format,
        settings.cost_line,
    )
}

pub fn run_stream<R, W, F>(
    reader: R,
    open_output: F,
    format: OutputFormat,
    cost_line: CostLinePolicy,
) -> Result<RunSummary>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> Result<W>,
{
    let mut input = InputStream::new(reader);
    let params = input.read_params()?;
    info!(ttask = params.ttask, umax = params.umax, "parameters loaded");

    let mut out = open_output()?;
    let mut formatter = formatter_for(format);
    let mut engine = SimulationEngine::new(params);
    let mut aborted = None;

    for event in input {
        match event.input {
            TickInput::Arrivals(count) => {
                let row = engine.step(count);
                debug!(
                    tick = row.tick,
                    arrivals = count,
                    servers = row.occupancies.len(),
                    total_cost = engine.total_cost(),
                    "tick processed"
                );
                formatter.write_row(&mut out, &row)?;
            }
            TickInput::Malformed(line) => {
                warn!(
                    tick = event.tick,
                    line = %line,
                    rc = RC_INVALID_CONTENT,
                    "stopping run on invalid content"
                );
                aborted = Some((event.tick, line));
                break;
            }
        }
    }

    let write_cost = aborted.is_none() || cost_line == CostLinePolicy::Always;
    let summary = RunSummary {
        params,
        ticks: engine.tick(),
        total_cost: write_cost.then(|| engine.total_cost()),
        peak_servers: engine.peak_servers(),
        aborted_at_tick: aborted.as_ref().map(|(tick, _)| *tick),
    };
    formatter.finish(&mut out, &summary)?;
    out.flush()?;

    match aborted {
        Some((tick, line)) => Err(Error::InvalidContent { tick, line }),
        None => {
            info!(
                ticks = summary.ticks,
                total_cost = engine.total_cost(),
                "run complete"
            );
            Ok(summary)
        }
    }
}
