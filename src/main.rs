use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nsqtop::data::format_duration;
use nsqtop::{Args, Config, NsqdClient, Scheduler, Settings};

fn main() -> ExitCode {
    // Help and version exit here, before anything else runs.
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so diagnostics never land in the dashboard.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nsqtop={level},nsqtop_adapters={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let settings = Settings::load(args.config.as_deref())?.merge_args(&args);
    let config = settings.validate()?;

    info!(
        nodes = ?config.addresses(),
        interval = %format_duration(config.interval()),
        timeout = %format_duration(config.request_timeout()),
        policy = ?config.failure_policy(),
        "starting nsqtop"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(watch(config, args.once))
}

/// Poll until shutdown, a fatal error, or after one pass with `--once`.
async fn watch(config: Config, once: bool) -> Result<ExitCode> {
    let client = NsqdClient::builder()
        .timeout(config.request_timeout())
        .build()
        .context("failed to build HTTP client")?;
    let mut scheduler = Scheduler::new(config, client, io::stdout());

    if once {
        let report = scheduler.pass().await?;
        return Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut poll = tokio::spawn(async move { scheduler.run().await });

    tokio::select! {
        joined = &mut poll => match joined {
            Ok(Ok(())) => Ok(ExitCode::SUCCESS),
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(anyhow::Error::new(e).context("poll loop panicked")),
        },
        _ = shutdown_signal() => {
            info!("shutdown signal received");
            poll.abort();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
