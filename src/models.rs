use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const TTASK_RANGE: RangeInclusive<u32> = 1..=10;
pub const UMAX_RANGE: RangeInclusive<u32> = 1..=10;

/// Retention window and per-server capacity, fixed for a whole run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SimParams {
    pub ttask: u32,
    pub umax: u32,
}

impl SimParams {
    pub fn new(ttask: u32, umax: u32) -> Result<Self> {
        if !TTASK_RANGE.contains(&ttask) {
            return Err(Error::InvalidTtask(ttask.to_string()));
        }
        if !UMAX_RANGE.contains(&umax) {
            return Err(Error::InvalidUmax(umax.to_string()));
        }
        Ok(Self { ttask, umax })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct RunConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub cost_line: CostLinePolicy,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Summary,
}

/// Whether the cost line is still written when a run stops on bad content.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum CostLinePolicy {
    #[default]
    Always,
    OnSuccess,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for CostLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CostLinePolicy::Always => "always",
            CostLinePolicy::OnSuccess => "on-success",
        };
        write!(f, "{}", label)
    }
}
