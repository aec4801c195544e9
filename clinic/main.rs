/// retinoscan Clinic
///
/// Browser front end for ocular disease detection: upload an eye-fundus
/// photograph, get a classification (cataract, diabetic retinopathy,
/// glaucoma, normal) with a probability chart, and download the accumulated
/// prediction log. Served by a synchronous tiny_http server; no JavaScript
/// frameworks required.
///
/// Run with:
///   cargo run --bin clinic --release
/// Then open http://127.0.0.1:7878
///
/// Expects in the working directory:
///   eye_disease.onnx — the trained checkpoint
///   logo.png, banner.png — branding images (optional; 404 when absent)

mod handlers;
mod render;
mod routes;
mod state;
mod util;

use std::sync::{Arc, Mutex};
use tiny_http::Server;

use state::ClinicState;

fn main() {
    let addr = "127.0.0.1:7878";
    let server = Server::http(addr).expect("Failed to bind HTTP server");

    let shared_state = Arc::new(Mutex::new(ClinicState::new()));

    println!("╔══════════════════════════════════════════════╗");
    println!("║          retinoscan Clinic                   ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{}                 ║", addr);
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Upload a fundus photo > Detect >            ║");
    println!("║  Review probabilities > Download log         ║");
    println!("╚══════════════════════════════════════════════╝");

    // Each request is dispatched on its own thread so a slow forward pass
    // does not stall asset requests or the keep-alive ping.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
