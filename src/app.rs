//! Process wiring for the `vuelog` binary.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use vuelog_core::config::{Config, SinkKind};
use vuelog_core::{Normalized, Normalizer, Origin, ToLineProtocol};
use vuelog_feeds::ingest::capture_timestamp_ns;
use vuelog_feeds::{
    line_queue, run_drain, BlockingSource, DrainStats, FileSink, FileSource, Ingestor, LineSource,
    StdoutSink,
};

/// Where `collect` reads lines from.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Read this file instead of stdin.
    pub file: Option<PathBuf>,
    /// Keep following `file` as it grows.
    pub follow: bool,
    /// Overrides `[ingest] device_name`.
    pub device_name: Option<String>,
}

pub fn build_normalizer(config: &Config) -> anyhow::Result<Normalizer> {
    let classifier = config
        .classifier
        .build()
        .context("building classifier patterns")?;
    Ok(Normalizer::new(classifier))
}

/// Run one source to completion (or until `shutdown`), draining into the
/// configured sink. Returns once every queued row has been forwarded,
/// including any unterminated tail the source flushes when interrupted.
///
/// Without `options.file` lines come from stdin, read on a dedicated thread
/// so an interrupt returns without waiting for the next line or EOF.
pub async fn collect(
    config: &Config,
    options: CollectOptions,
    shutdown: CancellationToken,
) -> anyhow::Result<DrainStats> {
    let normalizer = Arc::new(build_normalizer(config)?);
    let device_name = options
        .device_name
        .unwrap_or_else(|| config.ingest.device_name.clone());
    let origin = Some(Origin::Device(device_name));

    let (tx, queue) = line_queue();
    let ingestor = Ingestor::new(normalizer, tx);

    // Not a child of `shutdown`: the drain must outlive the source so rows
    // the source flushes on interrupt are still forwarded.
    let drain_shutdown = CancellationToken::new();
    let interval = config.drain.interval();
    let drain = match config.sink.kind {
        SinkKind::Stdout => tokio::spawn(run_drain(queue, StdoutSink::new(), interval, drain_shutdown.clone())),
        SinkKind::File => {
            let sink = FileSink::open(&config.sink.path).await?;
            tokio::spawn(run_drain(queue, sink, interval, drain_shutdown.clone()))
        }
    };

    let read = match options.file {
        Some(path) => {
            FileSource::new(path, origin)
                .follow(options.follow)
                .run(ingestor, shutdown)
                .await
        }
        None => BlockingSource::stdin(origin).run(ingestor, shutdown).await,
    };

    // The source is done; flush what it queued without waiting a full tick.
    drain_shutdown.cancel();
    let stats = drain.await.context("drain task panicked")?;
    let lines = read?;
    tracing::info!(lines, ?stats, "collection finished");
    Ok(stats)
}

/// Output format of the `parse` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseFormat {
    #[default]
    LineProtocol,
    Json,
}

/// Normalize each line with the current time and render it.
pub fn parse_lines<'a>(
    normalizer: &Normalizer,
    lines: impl IntoIterator<Item = &'a str>,
    origin: Option<&Origin>,
    format: ParseFormat,
) -> anyhow::Result<Vec<String>> {
    lines
        .into_iter()
        .map(|line| {
            let normalized = normalizer.normalize(line, capture_timestamp_ns(), origin);
            if let Normalized::Log { reason, .. } = &normalized {
                tracing::info!(%reason, line, "not a measurement");
            }
            match format {
                ParseFormat::LineProtocol => Ok(normalized.to_line_protocol()),
                ParseFormat::Json => serde_json::to_string(&normalized).map_err(Into::into),
            }
        })
        .collect()
}
