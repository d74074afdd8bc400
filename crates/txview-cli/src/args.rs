//! Command-line flags.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use txview_core::Config;

pub const USAGE: &str = "\
Usage: txview [OPTIONS]

Options:
  --api <URL>        Use the remote API at URL
  --fixture <PATH>   Use the dataset in PATH (JSON with employees and transactions)
  --latency <MS>     Delay fixture responses by MS milliseconds
  --save-config      Write the effective configuration to the config file
  -h, --help         Show this message
";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub api_base_url: Option<String>,
    pub fixture_path: Option<PathBuf>,
    pub latency_ms: Option<u64>,
    pub save_config: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => parsed.api_base_url = Some(value_for(&arg, args.next())?),
                "--fixture" => parsed.fixture_path = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--latency" => {
                    let raw = value_for(&arg, args.next())?;
                    parsed.latency_ms = Some(
                        raw.parse()
                            .with_context(|| format!("Invalid --latency value: {}", raw))?,
                    );
                }
                "--save-config" => parsed.save_config = true,
                "-h" | "--help" => parsed.help = true,
                other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }

    /// Flags win over the config file and the environment.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref url) = self.api_base_url {
            config.api_base_url = Some(url.clone());
        }
        if let Some(ref path) = self.fixture_path {
            config.api_base_url = None;
            config.fixture_path = Some(path.clone());
        }
        if let Some(ms) = self.latency_ms {
            config.simulated_latency_ms = Some(ms);
        }
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.starts_with("--") => Ok(v),
        _ => bail!("Missing value for {}", flag),
    }
}
