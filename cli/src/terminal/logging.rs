use colored::*;
use scanr_common::log::{ERROR_TARGET, INFO_TARGET, SUCCESS_TARGET, WARN_TARGET};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Installs the global subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_logging(default_level: LevelFilter) {
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let indicatif_layer = IndicatifLayer::new();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(ScanrFormatter)
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

pub struct ScanrFormatter;

impl ScanrFormatter {
    fn symbol(target: &str, level: &Level) -> ColoredString {
        match target {
            SUCCESS_TARGET => "[+]".green().bold(),
            INFO_TARGET => "[*]".blue().bold(),
            WARN_TARGET => "[!]".yellow().bold(),
            ERROR_TARGET => "[-]".red().bold(),
            _ => match *level {
                Level::TRACE => "[ ]".dimmed(),
                Level::DEBUG => "[?]".blue(),
                Level::INFO => "[*]".blue().bold(),
                Level::WARN => "[!]".yellow().bold(),
                Level::ERROR => "[-]".red().bold(),
            },
        }
    }
}

impl<S, N> FormatEvent<S, N> for ScanrFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        write!(writer, "{} ", Self::symbol(meta.target(), meta.level()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
