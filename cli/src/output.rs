//! Report rendering: plain text, JSON and CSV.
//!
//! The format of a saved report is picked from the file extension. Unknown extensions fall
//! back to text with `.txt` appended.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use scanr_common::config::ScanMethod;
use scanr_common::report::{HostResult, ScanReport};
use scanr_common::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Csv,
}

/// Picks the format for `path`, adjusting the path when the extension is not recognised.
pub fn resolve(path: &Path) -> (PathBuf, Format) {
    let ext: String = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => (path.to_path_buf(), Format::Json),
        "csv" => (path.to_path_buf(), Format::Csv),
        "txt" => (path.to_path_buf(), Format::Text),
        _ => {
            warn!("Unsupported extension '{ext}'. Using TXT format.");
            let mut adjusted = path.as_os_str().to_owned();
            adjusted.push(".txt");
            (PathBuf::from(adjusted), Format::Text)
        }
    }
}

/// Writes `report` to `path` and returns where it actually went.
pub fn save(report: &ScanReport, method: ScanMethod, path: &Path) -> anyhow::Result<PathBuf> {
    let (path, format) = resolve(path);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        Format::Text => writer.write_all(render_text(report, method).as_bytes())?,
        Format::Json => write_json(&mut writer, report)?,
        Format::Csv => write_csv(&mut writer, report)?,
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn render_text(report: &ScanReport, method: ScanMethod) -> String {
    let mut out = String::new();

    if method == ScanMethod::Icmp {
        out.push_str("Hosts on the given target are:\n");
        for host in report.active_hosts() {
            let _ = writeln!(out, "{}", host.target());
        }
    } else if report.active_hosts().is_empty() {
        out.push_str("No active hosts found.\n");
    } else {
        for (idx, host) in report.active_hosts().iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            render_host(&mut out, host);
        }
    }

    if report.skipped_count() > 0 {
        let _ = writeln!(
            out,
            "\n[*] Skipped {} hosts (not responding).",
            report.skipped_count()
        );
    }
    if report.indeterminate_count() > 0 {
        let _ = writeln!(
            out,
            "[!] {} hosts could not be checked for liveness and were scanned anyway.",
            report.indeterminate_count()
        );
    }
    if report.dropped_count() > 0 {
        let _ = writeln!(
            out,
            "[!] {} probes were dropped and are missing from the results.",
            report.dropped_count()
        );
    }
    out
}

fn render_host(out: &mut String, host: &HostResult) {
    let _ = writeln!(out, "Results for {} ({}):", host.target(), host.state());
    if host.open_ports().is_empty() {
        out.push_str("  No open ports found.\n");
        return;
    }
    for probe in host.open_ports() {
        let banner: String = probe
            .banner
            .as_deref()
            .map(|banner| format!(" ({banner})"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  Port {}: {}{banner} [{:.4}s]",
            probe.port,
            probe.state,
            probe.latency.as_secs_f64()
        );
    }
}

pub fn write_json<W: io::Write>(writer: W, report: &ScanReport) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, report).context("serializing report to JSON")
}

pub fn write_csv<W: io::Write>(writer: W, report: &ScanReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Target", "State", "Port", "Service", "Latency"])?;

    for host in report.active_hosts() {
        let target: String = host.target().to_string();
        let state: String = host.state().to_string();
        if host.open_ports().is_empty() {
            wtr.write_record([target.as_str(), state.as_str(), "N/A", "", ""])?;
        }
        for probe in host.open_ports() {
            let port: String = probe.port.to_string();
            let latency: String = format!("{:.4}s", probe.latency.as_secs_f64());
            wtr.write_record([
                target.as_str(),
                state.as_str(),
                port.as_str(),
                probe.banner.as_deref().unwrap_or(""),
                latency.as_str(),
            ])?;
        }
    }

    let summary: [String; 5] = [
        "Summary".to_string(),
        format!("Skipped: {}", report.skipped_count()),
        format!("Indeterminate: {}", report.indeterminate_count()),
        format!("Dropped: {}", report.dropped_count()),
        String::new(),
    ];
    wtr.write_record(&summary)?;
    wtr.flush()?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
