//! Mic command handler - sends method calls to the running daemon via IPC

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::recording::generate_segment_file_name;
use crate::infrastructure::XdgConfigStore;

use super::args::MicAction;
use super::ipc::create_ipc_client;
use super::presenter::Presenter;
use super::protocol::{CallReply, MethodCall};

/// Handle mic subcommand
pub async fn handle_mic_command(action: MicAction, presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();

    // Check if daemon is running
    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: micseg --daemon".to_string());
    }

    let call = build_call(action).await;

    let reply = client
        .send_call(&call)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    match reply {
        CallReply::Ok { state: Some(state) } => {
            presenter.daemon_status(&state);
        }
        CallReply::Ok { state: None } => {
            presenter.success(&format!("Command sent: {}", call.method));
        }
        CallReply::Error { code, message } => {
            return Err(format!("{}: {}", code, message));
        }
    }

    Ok(())
}

/// Build the method call, filling start defaults from the config file
async fn build_call(action: MicAction) -> MethodCall {
    match action {
        MicAction::Start {
            file_name,
            bit_rate,
            interval,
        } => {
            let store = XdgConfigStore::new();
            let config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

            let file_name = file_name.unwrap_or_else(generate_segment_file_name);
            let bit_rate = bit_rate.unwrap_or_else(|| config.bit_rate_or_default().as_bps());
            let interval = interval.unwrap_or_else(|| config.auto_save_interval_or_default());

            MethodCall::new("startMic")
                .arg("fileName", file_name)
                .arg("bitRate", bit_rate)
                .arg("autoSaveIntervalMinutes", interval)
        }
        MicAction::Save { file_name } => {
            let store = XdgConfigStore::new();
            let config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

            let file_name = file_name.unwrap_or_else(generate_segment_file_name);

            // The daemon keeps bit rate and interval pinned from the start
            // call; they are still required at the command surface.
            MethodCall::new("saveSegmentAndContinue")
                .arg("fileName", file_name)
                .arg("bitRate", config.bit_rate_or_default().as_bps())
                .arg("autoSaveIntervalMinutes", config.auto_save_interval_or_default())
        }
        MicAction::Finish { final_file_name } => {
            MethodCall::new("stopAndSaveFinalSegment").arg("finalFileName", final_file_name)
        }
        MicAction::ResetTimer => MethodCall::new("resetTimer"),
        MicAction::Stop => MethodCall::new("stopMic"),
        MicAction::Status => MethodCall::new("status"),
    }
}
