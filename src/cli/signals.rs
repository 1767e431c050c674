//! OS signal handling for daemon mode
//!
//! Shutdown signals are translated into service commands on the same
//! channel the daemon loop consumes, so teardown goes through the
//! controller like any other command.

use colored::Colorize;
use tokio::sync::mpsc;

use crate::application::ServiceCommand;

/// Install shutdown signal handlers that feed the command channel
#[cfg(unix)]
pub fn install(tx: mpsc::Sender<ServiceCommand>) -> Result<(), std::io::Error> {
    use tokio::signal::unix::{signal, SignalKind};

    // SIGINT (Ctrl+C)
    let tx_int = tx.clone();
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        sigint.recv().await;
        eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
        let _ = tx_int.send(ServiceCommand::Shutdown).await;
    });

    // SIGTERM
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        sigterm.recv().await;
        eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
        let _ = tx.send(ServiceCommand::Shutdown).await;
    });

    Ok(())
}

/// Install shutdown signal handlers that feed the command channel
#[cfg(not(unix))]
pub fn install(tx: mpsc::Sender<ServiceCommand>) -> Result<(), std::io::Error> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{} Received Ctrl+C (shutdown)", "↓".cyan());
            let _ = tx.send(ServiceCommand::Shutdown).await;
        }
    });

    Ok(())
}
