//! Scripted transport used by unit tests across the crate.

use super::transport::{ApiRequest, RawResponse, Transport};
use crate::domain::error::{InventoryError, Result};
use futures_util::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;

enum Reply {
    Response(RawResponse),
    Failure(String),
}

struct Scripted {
    reply: Reply,
    gate: Option<oneshot::Receiver<()>>,
}

/// Answers requests in FIFO order from a script and records every request.
///
/// A gated reply is held until its sender fires (or is dropped), which lets tests
/// control the order in which concurrent responses land.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, reply: Reply, gate: Option<oneshot::Receiver<()>>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted { reply, gate });
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(Reply::Response(Self::response(status, body)), None);
    }

    pub fn push_error(&self, message: &str) {
        self.push(Reply::Failure(message.to_string()), None);
    }

    /// Queues a reply that is released when the returned sender fires.
    pub fn push_gated_json(&self, status: u16, body: serde_json::Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Response(Self::response(status, body)), Some(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn response(status: u16, body: serde_json::Value) -> RawResponse {
        let status_text = match status {
            200 => "OK",
            201 => "Created",
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            409 => "Conflict",
            500 => "Internal Server Error",
            _ => "",
        };
        RawResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<RawResponse>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        Box::pin(async move {
            let Some(scripted) = next else {
                return Err(InventoryError::Transport("no scripted response".to_string()));
            };
            if let Some(gate) = scripted.gate {
                let _ = gate.await;
            }
            match scripted.reply {
                Reply::Response(response) => Ok(response),
                Reply::Failure(message) => Err(InventoryError::Transport(message)),
            }
        })
    }
}
