use std::io::Cursor;
use tiny_http::Response;

use crate::state::SharedState;

/// `GET /records/download`
///
/// Serves the cumulative prediction log as a CSV attachment. 404 until the
/// first prediction has been logged.
pub fn handle_download(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = state.lock().unwrap();
    match st.log.read() {
        Ok(csv) => crate::routes::csv_download_response(csv, "predictions.csv"),
        Err(_) => crate::routes::not_found(),
    }
}
