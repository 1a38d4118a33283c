use std::time::Instant;

use anyhow::Context;
use scanr_common::config::ScanConfig;
use scanr_common::network::{PortSpec, Target, target};
use scanr_common::{success, warn};
use scanr_core::Scanner;
use tokio::task;
use tracing::{Instrument, debug, info_span};

use crate::commands::CommandLine;
use crate::output;
use crate::terminal::{print, progress};

pub async fn scan(cmd: &CommandLine) -> anyhow::Result<()> {
    let ports: PortSpec = cmd.ports.parse().context("invalid port specification")?;

    let literals: Vec<String> = cmd.target.clone();
    let targets: Vec<Target> = task::spawn_blocking(move || target::expand_all(&literals))
        .await
        .context("target expansion did not finish")??;
    debug!("{} targets after expansion", targets.len());

    let config: ScanConfig = cmd.scan_config();
    if config.should_discover(targets.len()) && !is_root::is_root() {
        warn!("Not running as root. ICMP discovery needs raw socket privileges and will be limited.");
    }

    let span = info_span!("scan", indicatif.pb_show = true);
    let scanner = Scanner::new(config.clone()).on_progress(progress::reporter(span.clone()));

    let start_time: Instant = Instant::now();
    let report = scanner.run(targets, &ports).instrument(span).await;
    success!(
        "Scan finished in {:.2}s.",
        start_time.elapsed().as_secs_f64()
    );

    match &cmd.output {
        Some(path) => {
            let written = output::save(&report, config.method, path)?;
            success!("Results saved to {}", written.display());
        }
        None => {
            print::header("scan results");
            print::report(&output::render_text(&report, config.method));
        }
    }
    Ok(())
}
