pub mod scan;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use scanr_common::config::{DEFAULT_PORTS, ScanConfig, ScanMethod};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "scanr")]
#[command(about = "A concurrent network reconnaissance scanner.")]
pub struct CommandLine {
    /// Target IP address(es), hostname(s) or CIDR range(s)
    #[arg(required = true)]
    pub target: Vec<String>,

    /// Ports to scan, e.g. 22,80,8000-8100
    #[arg(long, default_value = DEFAULT_PORTS)]
    pub ports: String,

    /// icmp: discovery only, tcp: no discovery, auto: discovery for more than 5 targets
    #[arg(long, value_enum, default_value_t = Method::Auto)]
    pub method: Method,

    /// Timeout for each probe in seconds
    #[arg(long, default_value = "1.0", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Maximum number of probes in flight
    #[arg(long, default_value = "100")]
    pub threads: NonZeroUsize,

    /// Log live hosts and open ports as they are found
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings, errors and the results
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output file, format inferred from the extension (.json, .csv, .txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Tcp,
    Icmp,
    Auto,
}

impl From<Method> for ScanMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Tcp => ScanMethod::Tcp,
            Method::Icmp => ScanMethod::Icmp,
            Method::Auto => ScanMethod::Auto,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            method: self.method.into(),
            timeout: self.timeout,
            workers: self.threads.get(),
            verbose: self.verbose,
            ..ScanConfig::default()
        }
    }

    /// Default level when `RUST_LOG` is unset. `--verbose` adds live findings at INFO,
    /// engine internals stay behind `RUST_LOG=debug`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::WARN
        } else {
            LevelFilter::INFO
        }
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be positive, got {value}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
