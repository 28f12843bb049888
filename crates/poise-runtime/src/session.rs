//! WebSocket session - one per connected identity
//!
//! A session registers with the relay, then runs a single loop that
//! either flushes queued outbound messages or handles the next inbound
//! frame. Frame analysis runs on the blocking pool so the loop keeps
//! relaying while a frame is being analyzed.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use poise_core::{PoiseError, UserId};
use poise_signal::{Delivery, OutboundSender};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::protocol::{relay_text, Inbound, Outbound};
use crate::AppState;

/// Drive a WebSocket until it closes, errors or idles out
pub async fn run_session(mut socket: WebSocket, identity: UserId, state: AppState) {
    let (connection, reply, mut outbound) = state.relay.open(identity.clone());
    let idle = state.config.idle_timeout;
    let mut deadline = Instant::now() + idle;
    info!(%identity, %connection, "session started");

    loop {
        tokio::select! {
            queued = outbound.recv() => {
                let Some(text) = queued else { break };
                if let Err(e) = socket.send(Message::Text(text.to_string())).await {
                    debug!(%identity, "send failed: {}", e);
                    break;
                }
            }
            inbound = timeout_at(deadline, socket.recv()) => {
                match inbound {
                    Err(_) => {
                        info!(%identity, "session idle for {:?}, closing", idle);
                        break;
                    }
                    Ok(None) | Ok(Some(Ok(Message::Close(_)))) => break,
                    Ok(Some(Err(e))) => {
                        warn!(%identity, "WebSocket receive error: {}", e);
                        break;
                    }
                    Ok(Some(Ok(message))) => {
                        deadline = Instant::now() + idle;
                        if let Message::Text(text) = message {
                            dispatch(&state, &identity, &reply, &text);
                        }
                    }
                }
            }
        }
    }

    state.relay.release(identity.as_str(), connection);
    info!(%identity, %connection, "session ended");
}

/// Route one inbound text message
pub fn dispatch(state: &AppState, identity: &UserId, reply: &OutboundSender, text: &str) {
    if text.len() > state.config.max_frame_bytes {
        send_reply(reply, Outbound::error("message too large"));
        return;
    }

    match Inbound::parse(text) {
        Ok(Inbound::Frame { data }) => spawn_analysis(state, identity, reply, data),
        Ok(Inbound::Signal {
            kind,
            target,
            payload,
        }) => {
            let text = relay_text(payload, identity);
            match target {
                Some(target) => {
                    let delivery = state.relay.send(target.as_str(), text);
                    if delivery != Delivery::Delivered {
                        debug!(from = %identity, to = %target, %kind, ?delivery, "signal not delivered");
                    }
                }
                None => {
                    let excluding = HashSet::from([identity.clone()]);
                    let count = state.relay.broadcast(text, &excluding);
                    debug!(from = %identity, %kind, count, "signal broadcast");
                }
            }
        }
        Err(e) => send_reply(reply, Outbound::error(e.to_string())),
    }
}

/// Analyze a frame off the session loop and reply when done.
///
/// Frames arriving while every analysis permit is taken are skipped.
fn spawn_analysis(state: &AppState, identity: &UserId, reply: &OutboundSender, data: String) {
    let Ok(permit) = Arc::clone(&state.analysis_permits).try_acquire_owned() else {
        debug!(%identity, "analysis saturated, frame skipped");
        send_reply(reply, Outbound::error("analysis busy, frame skipped"));
        return;
    };

    let analyzer = state.analyzer.clone();
    let reply = reply.clone();
    let identity = identity.clone();
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || analyzer.analyze(&data)).await;
        drop(permit);

        let message = match result {
            Ok(Ok(analysis)) => Outbound::Analysis { feedback: analysis },
            Ok(Err(e)) => {
                debug!(%identity, "frame rejected: {}", e);
                Outbound::error(PoiseError::from(e).to_string())
            }
            Err(e) => {
                warn!(%identity, "analysis task failed: {}", e);
                Outbound::error("analysis failed")
            }
        };

        if reply.send(Arc::from(message.to_text())).await.is_err() {
            debug!(%identity, "session closed before analysis finished");
        }
    });
}

fn send_reply(reply: &OutboundSender, message: Outbound) {
    if reply.try_send(Arc::from(message.to_text())).is_err() {
        debug!("reply dropped, outbound queue full or closed");
    }
}
