//! `daybook-server`: serves the Resource API over HTTP.

use daybook_core::{init_logging, open_db, share, AppConfig};
use log::{error, info};
use std::net::SocketAddr;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("daybook-server: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&config.logging(true)) {
        eprintln!("daybook-server: logging disabled: {err}");
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("daybook-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let app = daybook_server::router(share(conn));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=server status=ok addr={} db_path={}",
        addr,
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=server status=error error={err}");
    }
}
