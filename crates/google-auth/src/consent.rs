//! Interactive consent through a loopback redirect
//!
//! Binds an ephemeral port on 127.0.0.1, prints the authorization URL, and
//! serves `GET /` until the browser is redirected back with
//! `?code=...&state=...`. Each connection is handled by its own task, so a
//! browser's idle preconnect never holds up the real callback.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::pkce::{build_authorization_url, compute_challenge, generate_state, generate_verifier};
use crate::secrets::ClientSecrets;
use crate::token::{TokenResponse, exchange_code};

const SUCCESS_PAGE: &str = "Authorization complete. You can close this window.";
const FAILURE_PAGE: &str = "Authorization failed. Return to the terminal for details.";

/// How long the callback server may take to finish answering the browser
/// once a result is in.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Outcome of one request received on the loopback listener.
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Code(String),
    /// No code and no error (e.g. the user reloading `/`), keep waiting.
    Ignored,
}

/// Shared by every connection of one consent flow. The sender is taken by
/// the first request that carries a result.
#[derive(Clone)]
struct CallbackState {
    expected_state: Arc<str>,
    result: Arc<Mutex<Option<oneshot::Sender<Result<String>>>>>,
}

impl CallbackState {
    fn deliver(&self, result: Result<String>) {
        let sender = self.result.lock().ok().and_then(|mut slot| slot.take());
        match sender {
            Some(sender) => {
                let _ = sender.send(result);
            }
            None => debug!("authorization result already delivered, ignoring callback"),
        }
    }
}

/// Run the full consent flow and exchange the resulting code for tokens.
pub async fn request_consent(
    http: &reqwest::Client,
    secrets: &ClientSecrets,
    scope: &str,
    timeout: Duration,
) -> Result<TokenResponse> {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .map_err(|e| Error::Io(format!("binding loopback listener: {e}")))?;
    let port = listener
        .local_addr()
        .map_err(|e| Error::Io(format!("reading loopback address: {e}")))?
        .port();
    let redirect_uri = format!("http://127.0.0.1:{port}");

    let verifier = generate_verifier();
    let challenge = compute_challenge(&verifier);
    let state = generate_state();
    let url = build_authorization_url(secrets, &redirect_uri, scope, &state, &challenge)?;

    eprintln!("Open this URL in a browser to authorize access:\n\n    {url}\n");
    info!(%redirect_uri, timeout_secs = timeout.as_secs(), "waiting for authorization callback");

    let code = await_callback(listener, &state, timeout).await?;
    exchange_code(http, secrets, &code, &verifier, &redirect_uri).await
}

/// Serve the callback route until a request carries the authorization result
/// or `timeout` elapses, then shut the server down.
async fn await_callback(
    listener: TcpListener,
    expected_state: &str,
    timeout: Duration,
) -> Result<String> {
    let (result_tx, result_rx) = oneshot::channel();
    let state = CallbackState {
        expected_state: Arc::from(expected_state),
        result: Arc::new(Mutex::new(Some(result_tx))),
    };
    let router = Router::new()
        .route("/", get(callback_handler))
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = tokio::time::timeout(timeout, result_rx).await;

    let _ = shutdown_tx.send(());
    if tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await.is_err() {
        warn!("callback server did not drain in time, aborting it");
        server.abort();
    }

    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(Error::Io(
            "callback server stopped before a result arrived".into(),
        )),
        Err(_) => Err(Error::ConsentTimeout(timeout.as_secs())),
    }
}

async fn callback_handler(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    match parse_callback(&params, &state.expected_state) {
        Ok(Callback::Code(code)) => {
            state.deliver(Ok(code));
            (StatusCode::OK, SUCCESS_PAGE)
        }
        Ok(Callback::Ignored) => (StatusCode::NOT_FOUND, ""),
        Err(e) => {
            state.deliver(Err(e));
            (StatusCode::BAD_REQUEST, FAILURE_PAGE)
        }
    }
}

fn parse_callback(params: &CallbackParams, expected_state: &str) -> Result<Callback> {
    if let Some(error) = &params.error {
        return Err(Error::ConsentDenied(error.clone()));
    }

    match &params.code {
        Some(code) if params.state.as_deref() == Some(expected_state) => {
            Ok(Callback::Code(code.clone()))
        }
        Some(_) => Err(Error::StateMismatch),
        None => Ok(Callback::Ignored),
    }
}
