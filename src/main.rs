use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ckfind::cli::commands::{handle_compile, handle_config, handle_run, handle_specs};
use ckfind::cli::{Cli, Commands};
use ckfind::models::{Config, OutputFormat};

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "ckfind=debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().unwrap_or_default();
    let format = cli.format.unwrap_or(config.search.default_format);
    let verbose = cli.verbose;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let code = run_command(cli.command, format, verbose, cancel).await?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

async fn run_command(
    command: Commands,
    format: OutputFormat,
    verbose: bool,
    cancel: CancellationToken,
) -> Result<i32> {
    match command {
        Commands::Run(args) => return handle_run(args, format, verbose, cancel).await,
        Commands::Compile(args) => {
            handle_compile(args, format, verbose).await?;
        }
        Commands::Specs(cmd) => {
            handle_specs(cmd, format, verbose).await?;
        }
        Commands::Config(cmd) => {
            handle_config(cmd, format, verbose).await?;
        }
    }

    Ok(0)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
