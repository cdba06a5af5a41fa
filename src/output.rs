use std::io::{self, Write};

use serde::Serialize;

use crate::engine::TickRow;
use crate::models::{OutputFormat, SimParams};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSummary {
    pub params: SimParams,
    pub ticks: u64,
    /// `None` when the cost line is suppressed for an aborted run.
    pub total_cost: Option<u64>,
    pub peak_servers: usize,
    pub aborted_at_tick: Option<u64>,
}

/// Rows arrive one tick at a time; `finish` is called once after the last.
pub trait Formatter {
    fn write_row(&mut self, out: &mut dyn Write, row: &TickRow) -> io::Result<()>;
    fn finish(&mut self, out: &mut dyn Write, summary: &RunSummary) -> io::Result<()>;
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Plain => Box::new(PlainFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::default()),
        OutputFormat::Summary => Box::new(SummaryFormatter),
    }
}

pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn write_row(&mut self, out: &mut dyn Write, row: &TickRow) -> io::Result<()> {
        writeln!(out, "{}", row)
    }

    fn finish(&mut self, out: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
        if let Some(cost) = summary.total_cost {
            writeln!(out, "{}", cost)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct JsonFormatter {
    rows: Vec<Vec<u32>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ttask: u32,
    umax: u32,
    rows: &'a [Vec<u32>],
    total_cost: Option<u64>,
    peak_servers: usize,
    aborted_at_tick: Option<u64>,
}

impl Formatter for JsonFormatter {
    fn write_row(&mut self, _out: &mut dyn Write, row: &TickRow) -> io::Result<()> {
        self.rows.push(row.occupancies.clone());
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
        let report = JsonReport {
            ttask: summary.params.ttask,
            umax: summary.params.umax,
            rows: &self.rows,
            total_cost: summary.total_cost,
            peak_servers: summary.peak_servers,
            aborted_at_tick: summary.aborted_at_tick,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)
    }
}

pub struct SummaryFormatter;

impl Formatter for SummaryFormatter {
    fn write_row(&mut self, _out: &mut dyn Write, _row: &TickRow) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
        writeln!(out, "ttask: {}", summary.params.ttask)?;
        writeln!(out, "umax: {}", summary.params.umax)?;
        writeln!(out, "ticks: {}", summary.ticks)?;
        writeln!(out, "peak_servers: {}", summary.peak_servers)?;
        if let Some(cost) = summary.total_cost {
            writeln!(out, "total_cost: {}", cost)?;
        }
        if let Some(tick) = summary.aborted_at_tick {
            writeln!(out, "aborted_at_tick: {}", tick)?;
        }
        Ok(())
    }
}
