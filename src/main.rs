use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use vuelog::app::{self, CollectOptions, ParseFormat};
use vuelog::core::config::Config;
use vuelog::core::Origin;

#[derive(Parser)]
#[command(name = "vuelog", about = "Emporia Vue telemetry → InfluxDB line protocol")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/vuelog/config.toml, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level instead of info (RUST_LOG takes precedence).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read lines from stdin or a file and forward line protocol to the sink.
    Collect {
        /// Read this log file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Keep following the file as it grows (requires --file).
        #[arg(long, requires = "file")]
        follow: bool,
        /// Device name tagged on fallback log rows.
        #[arg(long)]
        device_name: Option<String>,
    },
    /// Normalize the given lines (or stdin) and print one row per line.
    Parse {
        #[arg(long, value_enum, default_value_t = Format::Lp)]
        format: Format,
        lines: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Lp,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Collect {
            file,
            follow,
            device_name,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let shutdown = CancellationToken::new();
                let on_signal = shutdown.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::info!("interrupt received, shutting down");
                        on_signal.cancel();
                    }
                });
                let options = CollectOptions {
                    file,
                    follow,
                    device_name,
                };
                app::collect(&config, options, shutdown).await.map(|_| ())
            })
        }
        Command::Parse { format, lines } => {
            let normalizer = app::build_normalizer(&config)?;
            let lines = if lines.is_empty() {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                input.lines().map(str::to_string).collect()
            } else {
                lines
            };
            let format = match format {
                Format::Lp => ParseFormat::LineProtocol,
                Format::Json => ParseFormat::Json,
            };
            let origin = Origin::Device(config.ingest.device_name.clone());
            for row in app::parse_lines(&normalizer, lines.iter().map(String::as_str), Some(&origin), format)? {
                println!("{row}");
            }
            Ok(())
        }
    }
}
