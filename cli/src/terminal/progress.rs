use indicatif::ProgressStyle;
use scanr_core::Phase;
use scanr_core::pool::Progress;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Progress hook that drives the bar attached to `span`.
pub fn reporter(span: Span) -> impl Fn(Phase, Progress) + Send + Sync + 'static {
    move |phase, progress| {
        if progress.completed == 0 {
            span.pb_set_style(&phase_style(phase));
            span.pb_set_length(progress.total as u64);
        }
        span.pb_set_position(progress.completed as u64);
    }
}

fn phase_style(phase: Phase) -> ProgressStyle {
    let label: &str = match phase {
        Phase::Discovery => "Discovery",
        Phase::PortScan => "Probing",
    };
    let template: String =
        format!("{{spinner:.blue}} {label} {{bar:40.green/white}} {{pos}}/{{len}} ({{percent}}%)");

    ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
}
