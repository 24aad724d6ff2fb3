//! Static responder for the published output tree.
//!
//! Every request, whatever its method or path, maps to a file under the
//! output root. There is no routing table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::build::OutputLock;

const RESERVED: &[u8] = b";/?:@&=+$,#";

struct ServerState {
    root: PathBuf,
    lock: OutputLock,
}

pub fn router(root: PathBuf, lock: OutputLock) -> Router {
    Router::new()
        .fallback(serve_file)
        .with_state(Arc::new(ServerState { root, lock }))
}

pub async fn serve(
    listener: TcpListener,
    root: PathBuf,
    lock: OutputLock,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, root = %root.display(), "serving");
    }
    axum::serve(listener, router(root, lock)).await
}

async fn serve_file(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let Some(request_path) = request_path(target) else {
        debug!(%target, "undecodable request");
        return error_response("text/plain");
    };
    let content_type = content_type_for(&request_path);
    let path = resolve_under(&state.root, &request_path);
    debug!(path = %path.display(), content_type, "request");

    let read = {
        let _guard = state.lock.read().await;
        tokio::fs::read(&path).await
    };

    match read {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            body,
        )
            .into_response(),
        Err(_) => error_response(content_type),
    }
}

fn error_response(content_type: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, content_type)],
        "Request error",
    )
        .into_response()
}

/// Decoded request path with the query dropped and every `..` removed.
///
/// Stripping `..` is a plain substring removal, not normalisation; it does not
/// on its own guarantee the result stays under the output root.
pub fn request_path(target: &str) -> Option<String> {
    let decoded = decode_uri(target)?;
    let path = decoded.split('?').next().unwrap_or_default();
    Some(path.replace("..", ""))
}

pub fn resolve_under(root: &Path, request_path: &str) -> PathBuf {
    root.join(request_path.trim_start_matches('/'))
}

pub fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}

/// Percent-decode like `decodeURI`: escapes of reserved characters stay
/// encoded. `None` on malformed escapes or invalid UTF-8.
pub fn decode_uri(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let hex = bytes.get(i + 1..i + 3)?;
        if !hex.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let value = u8::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?;
        if RESERVED.contains(&value) {
            out.extend_from_slice(&bytes[i..i + 3]);
        } else {
            out.push(value);
        }
        i += 3;
    }

    String::from_utf8(out).ok()
}
