use std::fs;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};
use crate::models::{CostLinePolicy, OutputFormat, RunConfig};

pub const USAGE: &str = "USAGE: tick-balancer <input-file> <output-file>";

#[derive(Parser, Debug)]
#[command(
    name = "tick-balancer",
    about = "Simulates tick-by-tick admission of users onto an elastic server pool"
)]
pub struct Args {
    /// Input file: ttask, umax, then one arrival count per line
    pub input: Option<PathBuf>,
    /// Output file, one occupancy row per tick followed by the total cost
    pub output: Option<PathBuf>,
    #[arg(long, help = "Run configuration file (.toml or .json)")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    #[arg(
        long,
        value_enum,
        help = "Write the cost line after an aborted run (always) or only after a clean one"
    )]
    pub cost_line: Option<CostLineArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Plain,
    Json,
    Summary,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CostLineArg {
    Always,
    OnSuccess,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Summary => OutputFormat::Summary,
        }
    }
}

impl From<CostLineArg> for CostLinePolicy {
    fn from(value: CostLineArg) -> Self {
        match value {
            CostLineArg::Always => CostLinePolicy::Always,
            CostLineArg::OnSuccess => CostLinePolicy::OnSuccess,
        }
    }
}

/// Fully resolved run: both paths known, file values merged with flags.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub cost_line: CostLinePolicy,
}

pub fn parse_args() -> Result<Args> {
    Args::try_parse().map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => Error::Cli(err.to_string()),
    })
}

/// Merges command-line arguments over the optional config file. Returns
/// `None` when either path is still missing, in which case the caller
/// prints [`USAGE`].
pub fn build_config(args: Args) -> Result<Option<RunSettings>> {
    let file_config = match &args.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };

    let input = args.input.or(file_config.input);
    let output = args.output.or(file_config.output);
    let (Some(input), Some(output)) = (input, output) else {
        return Ok(None);
    };

    Ok(Some(RunSettings {
        input,
        output,
        format: args.format.map(Into::into).unwrap_or(file_config.format),
        cost_line: args
            .cost_line
            .map(Into::into)
            .unwrap_or(file_config.cost_line),
    }))
}

pub fn load_config(path: &Path) -> Result<RunConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn write_temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be available")
            .as_nanos();
        path.push(format!("tick-balancer-unit-{}.{}", nanos, extension));
        fs::write(&path, contents).expect("config write should succeed");
        path
    }

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn positional_paths_build_default_settings() {
        let settings = build_config(args(&["tick-balancer", "in.txt", "out.txt"]))
            .expect("config should build")
            .expect("paths are present");
        assert_eq!(
            settings,
            RunSettings {
                input: PathBuf::from("in.txt"),
                output: PathBuf::from("out.txt"),
                format: OutputFormat::Plain,
                cost_line: CostLinePolicy::Always,
            }
        );
    }

    #[test]
    fn missing_output_yields_usage() {
        let settings = build_config(args(&["tick-balancer", "in.txt"])).expect("no error");
        assert!(settings.is_none());
        let settings = build_config(args(&["tick-balancer"])).expect("no error");
        assert!(settings.is_none());
    }

    #[test]
    fn flags_override_config_file() {
        let path = write_temp_config(
            r#"
input = "from-file.txt"
output = "from-file.out"
format = "summary"
cost_line = "on-success"
"#,
            "toml",
        );
        let settings = build_config(args(&[
            "tick-balancer",
            "--config",
            path.to_str().unwrap(),
            "--format",
            "json",
            "cli.txt",
        ]))
        .expect("config should build")
        .expect("paths are present");
        assert_eq!(settings.input, PathBuf::from("cli.txt"));
        assert_eq!(settings.output, PathBuf::from("from-file.out"));
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.cost_line, CostLinePolicy::OnSuccess);
    }

    #[test]
    fn json_config_is_supported() {
        let path = write_temp_config(r#"{"input": "a.txt", "output": "b.txt"}"#, "json");
        let config = load_config(&path).expect("json config should load");
        assert_eq!(config.input, Some(PathBuf::from("a.txt")));
        assert_eq!(config.format, OutputFormat::Plain);
    }

    #[test]
    fn unsupported_extension_errors() {
        let path = write_temp_config("input = \"a\"", "yaml");
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.to_string(), "unsupported config format 'yaml'");
    }

    #[test]
    fn unknown_format_value_is_rejected_by_parser() {
        let result = Args::try_parse_from(["tick-balancer", "--format", "xml", "a", "b"]);
        assert!(result.is_err());
    }
}
