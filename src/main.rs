use onsite_calendar::{
    calendar::SystemClock, models::StateChange, router, AppState, CalendarSession, Config,
    FileStorage, SessionSettings,
};
use std::net::SocketAddr;
use tokio::{fs, signal, sync::broadcast};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let storage = FileStorage::new(&config.data_path);
    info!(path = %storage.path().display(), "loading attendance record");
    let session = CalendarSession::open(storage, SystemClock, SessionSettings::from(&config)).await;
    tokio::spawn(log_changes(session.subscribe()));
    info!(on_site = session.month_count(), "attendance record loaded");

    let state = AppState::new(session);
    let app = router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.session.lock().await.on_close().await;
    Ok(())
}

async fn log_changes(mut changes: broadcast::Receiver<StateChange>) {
    loop {
        match changes.recv().await {
            Ok(change) => debug!(?change, "re-render requested"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("change feed lagged, skipped {skipped} notifications")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
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
    info!("shutting down");
}
