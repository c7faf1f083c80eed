//! Shutdown signals
//!
//! Ctrl+C (and SIGTERM on unix) flip a [`CancelFlag`]; demos and the status
//! updater poll it between frames and wind down on their own.

use std::future::{self, Future};
use std::io;
use std::thread::{self, JoinHandle};

use tokio::signal;
use tracing::{error, info};

use crate::time::CancelFlag;

/// Cancel `flag` once `signal` completes
///
/// The signal future runs on its own thread with a single-threaded runtime,
/// so callers can stay fully blocking.
pub fn cancel_on<F>(flag: CancelFlag, signal: F) -> io::Result<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("ember-signal".into())
        .spawn(move || {
            runtime.block_on(signal);
            flag.cancel();
        })
}

/// Cancel `flag` on Ctrl+C or SIGTERM
pub fn cancel_on_shutdown(flag: CancelFlag) -> io::Result<JoinHandle<()>> {
    cancel_on(flag, shutdown())
}

async fn shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, stopping"),
        _ = terminate => info!("Received SIGTERM, stopping"),
    }
}
