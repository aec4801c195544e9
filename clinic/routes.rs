use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::{self, SharedState};

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"text/html; charset=utf-8").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::new(
        StatusCode(303),
        vec![
            Header::from_bytes(b"Location", location.as_bytes()).unwrap(),
            Header::from_bytes(b"Content-Length", b"0").unwrap(),
        ],
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

pub fn csv_download_response(body: String, filename: &str) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Response::new(
        StatusCode(200),
        vec![
            Header::from_bytes(b"Content-Type", b"text/csv; charset=utf-8").unwrap(),
            Header::from_bytes(b"Content-Disposition", disposition.as_bytes()).unwrap(),
        ],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn image_response(bytes: Vec<u8>, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", content_type.as_bytes()).unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn text_response(body: &str) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.as_bytes().to_vec();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"text/plain").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = b"404 Not Found".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(404),
        vec![Header::from_bytes(b"Content-Type", b"text/plain").unwrap()],
        Cursor::new(body),
        Some(len),
        None,
    )
}

/// Serves a branding image from its fixed working-directory path.
fn asset_response(path: &str) -> Response<Cursor<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => image_response(bytes, "image/png"),
        Err(_) => not_found(),
    }
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so the dispatcher keeps ownership and
/// can call `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or(&url).to_owned();

    let response = match (method, path.as_str()) {
        // ── Main page ────────────────────────────────────────────────────
        (Method::Get,  "/")                 => handlers::detect::handle_get(state),

        // ── Detection ────────────────────────────────────────────────────
        (Method::Post, "/detect")           => handlers::detect::handle_post(&mut request, state),
        (Method::Get,  "/scan/image")       => handlers::detect::handle_scan_image(state),

        // ── Prediction log ───────────────────────────────────────────────
        (Method::Get,  "/records/download") => handlers::records::handle_download(state),

        // ── Branding assets ──────────────────────────────────────────────
        (Method::Get,  "/assets/logo.png")   => asset_response(state::LOGO_PATH),
        (Method::Get,  "/assets/banner.png") => asset_response(state::BANNER_PATH),

        // ── Keep-alive ping ──────────────────────────────────────────────
        (Method::Get,  "/stream")           => text_response("ok"),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}
