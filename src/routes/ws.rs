//! WebSocket handler — live record stream plus upload commands.
//!
//! DESIGN
//! ======
//! On upgrade the connection subscribes to the simulator (atomically with a
//! snapshot of current records) and enters a `select!` loop:
//! - Incoming client frames → parse + dispatch by syscall prefix
//! - Simulator events → `upload:changed` / `upload:removed` item frames
//!
//! Handler functions validate, call the simulator, and return the reply
//! payload or a ready error frame. The dispatch layer wraps the payload in a
//! done frame.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → subscribe → send `session:connected` and one
//!    `upload:changed` per existing record
//! 2. Client sends frames → dispatch → done/error reply
//! 3. Close, or the simulator drops a lagging subscription → unsubscribe.
//!    The client reconnects to resync.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::frame::{Data, ErrorCode, Frame, Status};
use crate::reports::ReportKind;
use crate::routes::reports::ReportView;
use crate::services::upload::RecordEvent;
use crate::state::AppState;

pub const SYSCALL_CONNECTED: &str = "session:connected";
pub const SYSCALL_CHANGED: &str = "upload:changed";
pub const SYSCALL_REMOVED: &str = "upload:removed";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid record id: {0}")]
    InvalidId(String),
    #[error("unknown syscall: {0}")]
    UnknownSyscall(String),
}

impl ErrorCode for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "E_MISSING_FIELD",
            Self::InvalidId(_) => "E_INVALID_ID",
            Self::UnknownSyscall(_) => "E_UNKNOWN_SYSCALL",
        }
    }
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (mut subscription, snapshot) = state.simulator.subscribe_with_snapshot().await;

    let welcome = Frame::event(SYSCALL_CONNECTED, Data::new())
        .with_data("client_id", client_id.to_string())
        .with_data("records", snapshot.len());
    let mut greeting = vec![welcome];
    greeting.extend(
        snapshot
            .into_iter()
            .map(|record| event_frame(&RecordEvent::Changed { record })),
    );
    if send_frames(&mut socket, &greeting).await.is_err() {
        state.simulator.unsubscribe(subscription.id).await;
        return;
    }

    info!(%client_id, subscriber = %subscription.id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = process_inbound_text(&state, client_id, &text).await;
                        if send_frames(&mut socket, &replies).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            event = subscription.events.recv() => {
                let Some(event) = event else {
                    warn!(%client_id, subscriber = %subscription.id, "ws: subscription dropped; closing");
                    break;
                };
                if send_frame(&mut socket, &event_frame(&event)).await.is_err() {
                    break;
                }
            }
        }
    }

    state.simulator.unsubscribe(subscription.id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the sender.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<Frame> {
    let req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new()).with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    info!(%client_id, id = %req.id, syscall = %req.syscall, status = ?req.status, "ws: recv frame");

    let result = match req.prefix() {
        "upload" => handle_upload(state, &req).await,
        "report" => handle_report(&req),
        _ => Err(req.error_from(&GatewayError::UnknownSyscall(req.syscall.clone()))),
    };

    match result {
        Ok(data) => vec![req.done_with(data)],
        Err(err_frame) => vec![err_frame],
    }
}

// =============================================================================
// UPLOAD HANDLERS
// =============================================================================

async fn handle_upload(state: &AppState, req: &Frame) -> Result<Data, Frame> {
    let sim = &state.simulator;
    match req.syscall.as_str() {
        "upload:submit" => {
            let Some(name) = req.data_str("name") else {
                return Err(req.error_from(&GatewayError::MissingField("name")));
            };
            let record = sim.submit(name).await.map_err(|e| req.error_from(&e))?;
            let mut data = Data::new();
            data.insert("record".into(), json!(record));
            Ok(data)
        }
        "upload:remove" => {
            let removed = if let Some(raw) = req.data_str("id") {
                let id = Uuid::parse_str(raw).map_err(|_| req.error_from(&GatewayError::InvalidId(raw.to_owned())))?;
                usize::from(sim.remove_record(id).await.is_some())
            } else if let Some(name) = req.data_str("name") {
                sim.remove(name).await
            } else {
                return Err(req.error_from(&GatewayError::MissingField("name")));
            };
            let mut data = Data::new();
            data.insert("removed".into(), json!(removed));
            Ok(data)
        }
        "upload:list" => {
            let records = sim.list().await;
            let mut data = Data::new();
            data.insert("records".into(), json!(records));
            Ok(data)
        }
        _ => Err(req.error_from(&GatewayError::UnknownSyscall(req.syscall.clone()))),
    }
}

// =============================================================================
// REPORT HANDLERS
// =============================================================================

fn handle_report(req: &Frame) -> Result<Data, Frame> {
    match req.syscall.as_str() {
        "report:get" => {
            let Some(raw) = req.data_str("kind") else {
                return Err(req.error_from(&GatewayError::MissingField("kind")));
            };
            let kind: ReportKind = raw.parse().map_err(|e| req.error_from(&e))?;
            let mut data = Data::new();
            data.insert("report".into(), json!(ReportView::of(kind)));
            Ok(data)
        }
        _ => Err(req.error_from(&GatewayError::UnknownSyscall(req.syscall.clone()))),
    }
}

/// Item frame for one simulator event.
pub(crate) fn event_frame(event: &RecordEvent) -> Frame {
    match event {
        RecordEvent::Changed { record } => Frame::event(SYSCALL_CHANGED, Data::new()).with_data("record", json!(record)),
        RecordEvent::Removed { id, identifier } => Frame::event(SYSCALL_REMOVED, Data::new())
            .with_data("id", id.to_string())
            .with_data("identifier", identifier.as_str()),
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

async fn send_frames(socket: &mut WebSocket, frames: &[Frame]) -> Result<(), ()> {
    for frame in frames {
        send_frame(socket, frame).await?;
    }
    Ok(())
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == Status::Error {
        let code = frame.data_str("code").unwrap_or("-");
        let message = frame.data_str("message").unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, code, message, "ws: send frame status=Error");
    } else if frame.syscall != SYSCALL_CHANGED {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
