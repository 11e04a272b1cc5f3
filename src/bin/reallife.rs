//! Runs the reallife HTTP client and its weekly rebuild.
//!
//! Usage:
//!
//! ```text
//! reallife [--config <path>] [--port <port>] [--log-level <filter>] [--no-scheduler]
//! ```

use camino::Utf8PathBuf;
use clap::Parser;
use reallife::config::ReallifeConfig;
use reallife::server::{self, DesktopContext, StartupError};
use tokio::net::TcpListener;

/// Command-line flags; they override the file and environment.
#[derive(Debug, Parser)]
#[command(name = "reallife", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "REALLIFE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Port to listen on, keeping the configured host.
    #[arg(long)]
    port: Option<u16>,

    /// Log filter such as `debug` or `reallife=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Do not start the weekly rebuild.
    #[arg(long)]
    no_scheduler: bool,
}

impl Cli {
    fn resolve(&self) -> Result<ReallifeConfig, StartupError> {
        let mut config =
            ReallifeConfig::load(self.config.as_deref())?.apply_process_env()?;
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if self.no_scheduler {
            config.scheduler_enabled = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();
    reallife::telemetry::init(cli.log_level.as_deref())?;
    let config = cli.resolve()?;

    let context = DesktopContext::from_config(&config)?;
    let scheduler = config
        .scheduler_enabled
        .then(|| context.spawn_scheduler(config.schedule.clone()));

    let listener = TcpListener::bind(config.listen).await?;
    let app = server::router(context.clone());
    server::serve(listener, app, shutdown_signal()).await?;

    if let Some(running) = scheduler {
        running.shutdown_and_join().await;
    }
    let reports = context.controller().wait_for_sessions().await;
    tracing::info!(sessions = reports.len(), "shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
