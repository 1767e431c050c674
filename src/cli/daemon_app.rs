//! Daemon app runner
//!
//! Owns the single command channel. The IPC server, the OS signal
//! handlers and the rotation timer all feed it; the loop below is the
//! only consumer, so the controller never sees concurrent commands.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::application::ports::AudioEncoder;
use crate::application::{ControllerSettings, Flow, MicController, ServiceCommand};
use crate::domain::recording::RecorderState;
use crate::infrastructure::CpalEncoder;

use super::ipc::create_ipc_server;
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals;
use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Command channel depth
const COMMAND_BUFFER: usize = 32;

/// Parsed daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub output_dir: PathBuf,
}

/// Run daemon mode
pub async fn run_daemon(options: DaemonOptions) -> ExitCode {
    let presenter = Presenter::new();

    // Acquire PID file
    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => {
                presenter.error(&e.to_string());
            }
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Segment files land here; create it up front
    if let Err(e) = tokio::fs::create_dir_all(&options.output_dir).await {
        presenter.error(&format!(
            "Failed to create output directory {}: {}",
            options.output_dir.display(),
            e
        ));
        return ExitCode::from(EXIT_ERROR);
    }

    // Command channel shared by IPC, signals and the rotation timer
    let (tx, mut rx) = mpsc::channel::<ServiceCommand>(COMMAND_BUFFER);

    // Setup signal handlers (SIGINT/SIGTERM become Shutdown commands)
    if let Err(e) = signals::install(tx.clone()) {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    // Setup IPC server
    let mut ipc_server = create_ipc_server();
    if let Err(e) = ipc_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let endpoint = ipc_server.path();

    // Wrap state in Arc<Mutex> for sharing with the IPC server
    let state = Arc::new(Mutex::new(RecorderState::Idle));
    let state_for_ipc = Arc::clone(&state);
    let tx_for_ipc = tx.clone();

    // Spawn IPC server task
    tokio::spawn(async move {
        let _ = ipc_server
            .run(
                tx_for_ipc,
                Box::new(move || {
                    // Use std::sync::Mutex - safe because lock is very brief
                    *state_for_ipc.lock().unwrap_or_else(|e| e.into_inner())
                }),
            )
            .await;
    });

    presenter.daemon_status("Started, waiting for commands...");
    presenter.info(&format!(
        "PID: {} | Socket: {} | Output: {} | SIGINT: exit",
        std::process::id(),
        endpoint,
        options.output_dir.display()
    ));

    // The controller owns the encoder handle; rotations re-enter through tx
    let encoder = CpalEncoder::new();
    let settings = ControllerSettings {
        output_dir: options.output_dir,
    };
    let mut controller = MicController::new(encoder, settings, tx.clone());

    let result = daemon_loop(&mut controller, &mut rx, &presenter, &state).await;

    let _ = pid_file.release();

    if result {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

async fn daemon_loop<E: AudioEncoder>(
    controller: &mut MicController<E>,
    rx: &mut mpsc::Receiver<ServiceCommand>,
    presenter: &Presenter,
    shared_state: &Arc<Mutex<RecorderState>>,
) -> bool {
    loop {
        let command = match rx.recv().await {
            Some(command) => command,
            // Channel closed
            None => return false,
        };

        presenter.info(&format!(
            "Processing {:?}, state={}",
            command,
            controller.state()
        ));

        let outcome = controller.handle(command).await;

        // Surface non-fatal faults (stop or rename failures) collected
        // while handling the command
        for warning in controller.take_warnings() {
            presenter.warn(&warning);
        }

        // Publish the new state for status queries
        if let Ok(mut guard) = shared_state.lock() {
            *guard = controller.state();
        }

        match outcome {
            Ok(Flow::Continue) => {
                presenter.daemon_status(controller.state().as_str());
            }
            Ok(Flow::Stop) => {
                presenter.daemon_status("Stopped");
                return true;
            }
            Err(e) => {
                // Encoder setup failed; the recording attempt is dead
                presenter.error(&e.to_string());
                controller.teardown().await;
                for warning in controller.take_warnings() {
                    presenter.warn(&warning);
                }
                if let Ok(mut guard) = shared_state.lock() {
                    *guard = controller.state();
                }
                return false;
            }
        }
    }
}
