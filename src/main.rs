use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;

use gatehouse::cli::{Cli, Command, IssueTokenArgs, issue_token};
use gatehouse::logging::init_tracing;
use gatehouse::router::init_router;
use gatehouse::state::{AppState, init_app_state};
use gatehouse_config::{AppConfig, JwtConfig, LoggingConfig};

const LIMITER_HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::IssueToken(args) => handle_issue_token(&args),
    }
}

async fn serve() -> ExitCode {
    init_tracing(&LoggingConfig::from_env());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start: invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let state = match init_app_state(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start: invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    spawn_limiter_housekeeping(&state);

    let app = init_router(state);
    let address = config.server.bind_address();

    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %address, error = %e, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(address = %address, "gatehouse listening");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}

/// Periodically drops quota state for idle clients.
fn spawn_limiter_housekeeping(state: &AppState) {
    let limiters = state.rate_limiters.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_HOUSEKEEPING_INTERVAL);
        loop {
            interval.tick().await;
            limiters.retain_recent();
            tracing::trace!(tracked_clients = limiters.tracked_clients(), "rate limiter housekeeping");
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

fn handle_issue_token(args: &IssueTokenArgs) -> ExitCode {
    let jwt_config = match JwtConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match issue_token(args, &jwt_config) {
        Ok(token) => {
            println!("{token}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error issuing token: {e}");
            ExitCode::FAILURE
        }
    }
}
