//! HTTP debug server implementation.

use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::{CameraInfo, DebugState, FrameMetrics, PropertiesPatch};

#[derive(Debug, thiserror::Error)]
pub enum DebugServerError {
    #[error("Failed to bind to port {port}: {error}")]
    BindError { port: u16, error: String },
    #[error("Failed to spawn server thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// HTTP server for the debug API.
/// Runs on a background thread to avoid blocking the frame loop.
pub struct DebugServer {
    port: u16,
    actual_port: Option<u16>,
    server: Option<Arc<Server>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Deserialize)]
struct Command {
    command: String,
}

#[derive(Serialize)]
struct CommandResponse {
    executed: bool,
    command: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: f64,
}

#[derive(Serialize)]
struct MetricsResponse {
    #[serde(flatten)]
    metrics: FrameMetrics,
    camera: CameraInfo,
    overlay_enabled: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type HttpResponse = Response<Cursor<Vec<u8>>>;

impl DebugServer {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            actual_port: None,
            server: None,
            handle: None,
        }
    }

    pub fn start(&mut self, state: Arc<Mutex<DebugState>>) -> Result<(), DebugServerError> {
        let server = Server::http(format!("127.0.0.1:{}", self.port)).map_err(|e| {
            DebugServerError::BindError {
                port: self.port,
                error: e.to_string(),
            }
        })?;
        let server = Arc::new(server);

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.port);
        self.actual_port = Some(actual_port);

        let worker = Arc::clone(&server);
        let handle = thread::Builder::new()
            .name("debug-api".to_string())
            .spawn(move || Self::run_server(&worker, &state))?;

        tracing::info!("Debug API listening on http://127.0.0.1:{actual_port}");
        self.server = Some(server);
        self.handle = Some(handle);
        Ok(())
    }

    /// Unblock the accept loop and join the worker thread.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            server.unblock();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Debug server thread panicked");
            }
        }
    }

    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.port)
    }

    fn run_server(server: &Server, state: &Mutex<DebugState>) {
        for request in server.incoming_requests() {
            if let Err(e) = Self::handle_request(request, state) {
                tracing::warn!("Debug server error: {e}");
            }
        }
        tracing::debug!("Debug API stopped");
    }

    fn handle_request(
        mut request: Request,
        state: &Mutex<DebugState>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let response = match (request.method(), request.url()) {
            (&Method::Get, "/health") => json_response(&HealthResponse {
                status: "ok",
                uptime_seconds: lock(state).metrics.uptime_seconds,
            })?,
            (&Method::Get, "/metrics") => {
                let state = lock(state);
                json_response(&MetricsResponse {
                    metrics: state.metrics,
                    camera: state.camera,
                    overlay_enabled: state.overlay_enabled,
                })?
            }
            (&Method::Get, "/properties") => json_response(&lock(state).properties)?,
            (&Method::Post, "/properties") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<PropertiesPatch>(&body) {
                    Ok(patch) => {
                        let mut state = lock(state);
                        let updated = state
                            .pending_properties
                            .unwrap_or(state.properties)
                            .patched(&patch);
                        state.pending_properties = Some(updated);
                        json_response(&updated)?
                    }
                    Err(e) => bad_request(e)?,
                }
            }
            (&Method::Post, "/command") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<Command>(&body) {
                    Ok(command) => {
                        let executed = match command.command.as_str() {
                            "quit" => {
                                lock(state).quit_requested = true;
                                true
                            }
                            "toggle_overlay" => {
                                lock(state).toggle_overlay_requested = true;
                                true
                            }
                            _ => false,
                        };
                        json_response(&CommandResponse {
                            executed,
                            command: command.command,
                        })?
                    }
                    Err(e) => bad_request(e)?,
                }
            }
            _ => Response::from_string("Not Found").with_status_code(404),
        };

        request.respond(response)?;
        Ok(())
    }
}

impl Drop for DebugServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(state: &Mutex<DebugState>) -> MutexGuard<'_, DebugState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn json_response<T: Serialize>(value: &T) -> Result<HttpResponse, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let response = Response::from_string(json);
    Ok(match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    })
}

fn bad_request(error: serde_json::Error) -> Result<HttpResponse, serde_json::Error> {
    Ok(json_response(&ErrorResponse {
        error: error.to_string(),
    })?
    .with_status_code(400))
}
