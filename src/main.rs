// Command-line front for one-off checks without the browser clinic.
// The full interactive application is the `clinic` binary:
//   cargo run --bin clinic --release

use std::process::ExitCode;

use retinoscan::classifier::DEFAULT_CHECKPOINT_PATH;
use retinoscan::{Classifier, DiseaseClass, ScanError};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let image_path = match positional.first() {
        Some(p) => p.as_str(),
        None => {
            eprintln!("Usage: retinoscan <image.jpg|image.png> [checkpoint.onnx] [--json]");
            return ExitCode::FAILURE;
        }
    };
    let checkpoint = positional
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_CHECKPOINT_PATH);

    match run(image_path, checkpoint, as_json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(image_path: &str, checkpoint: &str, as_json: bool) -> Result<(), ScanError> {
    let bytes = std::fs::read(image_path)?;
    let classifier = Classifier::load(checkpoint)?;
    let prediction = classifier.predict(&bytes)?;

    if as_json {
        match serde_json::to_string_pretty(&prediction) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: could not serialize prediction: {}", e),
        }
    } else {
        println!("Detected disease: {}", prediction.class.display_name());
        for class in DiseaseClass::ALL {
            println!(
                "  {:<22} {:>5.1}%",
                class.display_name(),
                prediction.probabilities[class.index()] * 100.0
            );
        }
    }
    Ok(())
}
