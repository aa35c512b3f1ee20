use anyhow::Context;

use tracing::{subscriber::set_global_default, Subscriber};

use tracing_log::LogTracer;

use tracing_subscriber::fmt::{self, format::FmtSpan, MakeWriter};
use tracing_subscriber::EnvFilter;

use crate::settings::TelemetrySettings;

/// Build the subscriber for the whole service, either human-readable or one JSON object per line
pub fn create_subscriber<Sink>(
    settings: &TelemetrySettings,
    sink: Sink,
) -> Box<dyn Subscriber + Send + Sync>
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = fmt::fmt()
        .with_env_filter(EnvFilter::new(settings.env_filter()))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(sink);

    if settings.json() {
        Box::new(builder.json().with_current_span(true).finish())
    } else {
        Box::new(builder.finish())
    }
}

/// Install the subscriber and route `log` records from dependencies into it
pub fn set_subscriber(subscriber: impl Subscriber + Send + Sync) -> anyhow::Result<()> {
    LogTracer::init().context("Failed to initalize logging")?;

    set_global_default(subscriber).context("Failed to set global subscriber")
}
