use std::sync::Arc;

use classroom_coach::{api::{self, AppState}, init_tracing, Settings};
use tokio::net::{TcpListener, UnixListener};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let settings = Settings::from_env()?;

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut port = settings.port.to_string();
    let mut unix_socket = None;

    let mut i = 1; // Skip program name
    while i < args.len() {
        if args[i] == "--unix" && i + 1 < args.len() {
            unix_socket = Some(args[i + 1].clone());
            i += 2;
        } else {
            port = args[i].clone();
            i += 1;
        }
    }

    let state = Arc::new(AppState::from_settings(&settings)?);
    let app = api::router(state);

    info!(model = %settings.completion.model, "Initialized routes");

    if let Some(socket_path) = unix_socket {
        // stale socket from a previous run
        tokio::fs::remove_file(&socket_path).await.ok();
        let listener = UnixListener::bind(&socket_path)?;

        info!("Starting server on Unix socket: {}", socket_path);
        axum::serve(listener, app.into_make_service()).await?;
    } else {
        let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
        info!("Starting server on port {}", port);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}
