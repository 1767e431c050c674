//! Wire protocol for daemon control
//!
//! Requests and replies are single JSON lines. A request names a method
//! and carries a loosely typed argument map; the reply is either ok
//! (with the recorder state for status queries) or a coded error.
//!
//! The dispatcher validates argument shape only. It never touches
//! recorder state: accepted calls are forwarded to the command channel
//! and acknowledged immediately.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ServiceCommand;
use crate::domain::recording::RecorderState;

/// Error code for a missing or wrongly typed required argument
pub const CODE_INVALID_ARGS: &str = "INVALID_ARGS";

/// Error code for an unknown method
pub const CODE_NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";

/// Error code for a request that is not a valid method call
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";

/// One method call from a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
}

impl MethodCall {
    /// Create a call with no arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Map::new(),
        }
    }

    /// Add an argument (builder style)
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// String argument; wrongly typed values count as missing
    fn str_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Value::as_str)
    }

    /// Unsigned argument; wrongly typed values count as missing
    fn u32_arg(&self, key: &str) -> Option<u32> {
        self.args
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }
}

/// Reply to a method call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CallReply {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
    },
    Error {
        code: String,
        message: String,
    },
}

impl CallReply {
    /// Plain acknowledgement
    pub fn ok() -> Self {
        Self::Ok { state: None }
    }

    /// Acknowledgement carrying the recorder state
    pub fn ok_with_state(state: RecorderState) -> Self {
        Self::Ok {
            state: Some(state.as_str().to_string()),
        }
    }

    /// Missing or wrongly typed required argument
    pub fn invalid_args(message: &str) -> Self {
        Self::Error {
            code: CODE_INVALID_ARGS.to_string(),
            message: message.to_string(),
        }
    }

    /// Unknown method
    pub fn not_implemented(method: &str) -> Self {
        Self::Error {
            code: CODE_NOT_IMPLEMENTED.to_string(),
            message: format!("Unknown method: {}", method),
        }
    }

    /// Request line was not a valid method call
    pub fn bad_request(message: &str) -> Self {
        Self::Error {
            code: CODE_BAD_REQUEST.to_string(),
            message: message.to_string(),
        }
    }

    /// Check for the ok status
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Outcome of dispatching one method call
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Forward the command to the recording controller
    Forward(ServiceCommand),
    /// Answer with the current recorder state
    Status,
    /// Answer immediately without forwarding anything
    Reply(CallReply),
}

/// Map a method call to a service command or an immediate reply
pub fn dispatch(call: &MethodCall) -> Dispatch {
    match call.method.as_str() {
        "startMic" => {
            let file_name = call.str_arg("fileName");
            let bit_rate = call.u32_arg("bitRate");
            let interval = call.u32_arg("autoSaveIntervalMinutes");
            match (file_name, bit_rate, interval) {
                (Some(file_name), Some(bit_rate), Some(interval)) => {
                    Dispatch::Forward(ServiceCommand::StartMic {
                        file_name: file_name.to_string(),
                        bit_rate,
                        auto_save_interval_minutes: interval,
                    })
                }
                _ => Dispatch::Reply(CallReply::invalid_args(
                    "fileName, bitRate and autoSaveIntervalMinutes are required",
                )),
            }
        }
        "saveSegmentAndContinue" => {
            let file_name = call.str_arg("fileName");
            let bit_rate = call.u32_arg("bitRate");
            let interval = call.u32_arg("autoSaveIntervalMinutes");
            // Bit rate and interval are validated for shape only; the
            // controller keeps the values pinned at the initial start.
            match (file_name, bit_rate, interval) {
                (Some(file_name), Some(_), Some(_)) => {
                    Dispatch::Forward(ServiceCommand::SaveSegment {
                        file_name: Some(file_name.to_string()),
                    })
                }
                _ => Dispatch::Reply(CallReply::invalid_args(
                    "fileName, bitRate and autoSaveIntervalMinutes are required",
                )),
            }
        }
        "stopAndSaveFinalSegment" => match call.str_arg("finalFileName") {
            Some(name) => Dispatch::Forward(ServiceCommand::StopAndSaveFinal {
                final_file_name: name.to_string(),
            }),
            None => Dispatch::Reply(CallReply::invalid_args("finalFileName is required")),
        },
        "resetTimer" => Dispatch::Forward(ServiceCommand::ResetTimer),
        "stopMic" => Dispatch::Forward(ServiceCommand::StopMic),
        "status" => Dispatch::Status,
        _ => Dispatch::Reply(CallReply::not_implemented(&call.method)),
    }
}

/// Handle one request line: parse, dispatch, produce the reply and the
/// command to forward, if any
pub fn handle_request_line(
    line: &str,
    state: RecorderState,
) -> (Option<ServiceCommand>, CallReply) {
    let call: MethodCall = match serde_json::from_str(line.trim()) {
        Ok(call) => call,
        Err(e) => {
            return (
                None,
                CallReply::bad_request(&format!("Malformed request: {}", e)),
            )
        }
    };

    match dispatch(&call) {
        Dispatch::Forward(cmd) => (Some(cmd), CallReply::ok()),
        Dispatch::Status => (None, CallReply::ok_with_state(state)),
        Dispatch::Reply(reply) => (None, reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_mic_with_all_args_forwards() {
        let call = MethodCall::new("startMic")
            .arg("fileName", "Rec_001.flac")
            .arg("bitRate", 128_000)
            .arg("autoSaveIntervalMinutes", 5);

        assert_eq!(
            dispatch(&call),
            Dispatch::Forward(ServiceCommand::StartMic {
                file_name: "Rec_001.flac".to_string(),
                bit_rate: 128_000,
                auto_save_interval_minutes: 5,
            })
        );
    }

    #[test]
    fn start_mic_missing_bit_rate_is_invalid_args() {
        let call = MethodCall::new("startMic")
            .arg("fileName", "Rec_001.flac")
            .arg("autoSaveIntervalMinutes", 5);

        match dispatch(&call) {
            Dispatch::Reply(CallReply::Error { code, .. }) => {
                assert_eq!(code, CODE_INVALID_ARGS);
            }
            other => panic!("Expected invalid args, got {:?}", other),
        }
    }

    #[test]
    fn start_mic_wrongly_typed_arg_counts_as_missing() {
        let call = MethodCall::new("startMic")
            .arg("fileName", "Rec_001.flac")
            .arg("bitRate", "128000")
            .arg("autoSaveIntervalMinutes", 5);

        match dispatch(&call) {
            Dispatch::Reply(CallReply::Error { code, .. }) => {
                assert_eq!(code, CODE_INVALID_ARGS);
            }
            other => panic!("Expected invalid args, got {:?}", other),
        }
    }

    #[test]
    fn save_segment_with_all_args_forwards() {
        let call = MethodCall::new("saveSegmentAndContinue")
            .arg("fileName", "next.flac")
            .arg("bitRate", 128_000)
            .arg("autoSaveIntervalMinutes", 5);

        assert_eq!(
            dispatch(&call),
            Dispatch::Forward(ServiceCommand::SaveSegment {
                file_name: Some("next.flac".to_string()),
            })
        );
    }

    #[test]
    fn save_segment_missing_args_is_invalid_args() {
        // No args at all
        match dispatch(&MethodCall::new("saveSegmentAndContinue")) {
            Dispatch::Reply(CallReply::Error { code, .. }) => {
                assert_eq!(code, CODE_INVALID_ARGS);
            }
            other => panic!("Expected invalid args, got {:?}", other),
        }

        // fileName alone is not enough
        let call = MethodCall::new("saveSegmentAndContinue").arg("fileName", "next.flac");
        match dispatch(&call) {
            Dispatch::Reply(CallReply::Error { code, .. }) => {
                assert_eq!(code, CODE_INVALID_ARGS);
            }
            other => panic!("Expected invalid args, got {:?}", other),
        }
    }

    #[test]
    fn finalize_requires_final_file_name() {
        let call = MethodCall::new("stopAndSaveFinalSegment");
        match dispatch(&call) {
            Dispatch::Reply(CallReply::Error { code, .. }) => {
                assert_eq!(code, CODE_INVALID_ARGS);
            }
            other => panic!("Expected invalid args, got {:?}", other),
        }
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let call = MethodCall::new("pauseMic");
        match dispatch(&call) {
            Dispatch::Reply(CallReply::Error { code, .. }) => {
                assert_eq!(code, CODE_NOT_IMPLEMENTED);
            }
            other => panic!("Expected not implemented, got {:?}", other),
        }
    }

    #[test]
    fn status_answers_with_state() {
        let (cmd, reply) = handle_request_line(r#"{"method":"status"}"#, RecorderState::Recording);
        assert!(cmd.is_none());
        assert_eq!(
            reply,
            CallReply::Ok {
                state: Some("recording".to_string()),
            }
        );
    }

    #[test]
    fn malformed_line_is_bad_request() {
        let (cmd, reply) = handle_request_line("not json", RecorderState::Idle);
        assert!(cmd.is_none());
        match reply {
            CallReply::Error { code, .. } => assert_eq!(code, CODE_BAD_REQUEST),
            other => panic!("Expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn reply_serializes_to_wire_shape() {
        let ok = serde_json::to_string(&CallReply::ok()).unwrap();
        assert_eq!(ok, r#"{"status":"ok"}"#);

        let err = serde_json::to_string(&CallReply::invalid_args("fileName is required")).unwrap();
        assert!(err.contains(r#""status":"error""#));
        assert!(err.contains(r#""code":"INVALID_ARGS""#));
    }

    #[test]
    fn reset_timer_and_stop_mic_take_no_args() {
        assert_eq!(
            dispatch(&MethodCall::new("resetTimer")),
            Dispatch::Forward(ServiceCommand::ResetTimer)
        );
        assert_eq!(
            dispatch(&MethodCall::new("stopMic")),
            Dispatch::Forward(ServiceCommand::StopMic)
        );
    }
}
