use std::io::Cursor;
use tiny_http::{Request, Response};

use retinoscan::DiseaseClass;

use crate::render::{html_escape, render_page};
use crate::state::{FlashKind, FlashMessage, ScanResult, SharedState};
use crate::util::multipart::{extract_boundary, file_part, file_part_filename};

/// Bar colors per class, in output-vector order.
const BAR_COLORS: [&str; 4] = ["#d9534f", "#5cb85c", "#f0ad4e", "#428bca"];

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = state.lock().unwrap();
    let flash = st.take_flash();

    let flash_html = match flash {
        Some(FlashMessage { kind: FlashKind::Success, text }) => {
            format!(r#"<div class="flash flash-success">{}</div>"#, html_escape(&text))
        }
        Some(FlashMessage { kind: FlashKind::Error, text }) => {
            format!(r#"<div class="flash flash-error">{}</div>"#, html_escape(&text))
        }
        None => String::new(),
    };

    let result_html = match &st.last_scan {
        Some(scan) => build_result_card(scan),
        None => String::new(),
    };

    let download_html = if st.log.exists() {
        r#"<a class="btn btn-download" href="/records/download">Download Prediction Results</a>"#
            .to_owned()
    } else {
        String::new()
    };
    drop(st);

    let page = render_page(|tmpl| {
        tmpl.replace("{{FLASH_SECTION}}", &flash_html)
            .replace("{{RESULT_SECTION}}", &result_html)
            .replace("{{DOWNLOAD_SECTION}}", &download_html)
    });
    crate::routes::html_response(page)
}

// ---------------------------------------------------------------------------
// POST /detect
// ---------------------------------------------------------------------------

pub fn handle_post(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let upload = if content_type.starts_with("multipart/form-data") {
        let mut body: Vec<u8> = Vec::new();
        let _ = request.as_reader().read_to_end(&mut body);
        let boundary = extract_boundary(&content_type).unwrap_or_default();

        let filename = file_part_filename(&body, &boundary, "fundus_image")
            .unwrap_or_else(|| "uploaded_image".to_owned());
        file_part(&body, &boundary, "fundus_image")
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| (filename, bytes))
    } else {
        None
    };

    let mut st = state.lock().unwrap();
    match upload {
        Some((filename, bytes)) => {
            let outcome = st.classifier().and_then(|c| c.predict(&bytes));
            match outcome {
                Ok(prediction) => {
                    match st.log.append(&filename, prediction.class) {
                        Ok(()) => {
                            st.flash = Some(FlashMessage::success(format!(
                                "Detected disease: {}", prediction.class.display_name()
                            )));
                        }
                        Err(e) => {
                            st.flash = Some(FlashMessage::error(format!(
                                "Prediction succeeded but could not be logged: {}", e
                            )));
                        }
                    }
                    st.last_scan = Some(ScanResult { image_name: filename, image_bytes: bytes, prediction });
                }
                Err(e) => {
                    st.flash = Some(FlashMessage::error(format!("Detection failed: {}", e)));
                    st.last_scan = None;
                }
            }
        }
        None => {
            st.flash = Some(FlashMessage::error("No image file was uploaded."));
        }
    }
    drop(st);

    crate::routes::redirect("/")
}

// ---------------------------------------------------------------------------
// GET /scan/image
// ---------------------------------------------------------------------------

/// Serves the most recently uploaded photograph back for the result card.
pub fn handle_scan_image(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = state.lock().unwrap();
    match &st.last_scan {
        Some(scan) => {
            let content_type = sniff_content_type(&scan.image_bytes);
            crate::routes::image_response(scan.image_bytes.clone(), content_type)
        }
        None => crate::routes::not_found(),
    }
}

/// PNG starts with an 8-byte signature; everything else we accept is JPEG.
fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        "image/jpeg"
    }
}

// ---------------------------------------------------------------------------
// Result card
// ---------------------------------------------------------------------------

fn build_result_card(scan: &ScanResult) -> String {
    let prediction = &scan.prediction;

    let rows: String = DiseaseClass::ALL
        .iter()
        .map(|&class| {
            let p = prediction.probabilities[class.index()];
            let pct = p * 100.0;
            let width = (p * 260.0) as u32;
            let dim = if class != prediction.class { " dim" } else { "" };
            format!(
                r#"<tr><td class="prob-label">{label}</td><td><div class="bar-wrap"><div class="bar-fill{dim}" style="width:{width}px;background:{color}"></div></div></td><td class="prob-pct">{pct:.1}%</td></tr>"#,
                label = class.display_name(),
                dim = dim,
                width = width,
                color = BAR_COLORS[class.index()],
                pct = pct,
            )
        })
        .collect();

    format!(
        r#"<div class="result-card">
<h2>Result</h2>
<img class="scan-photo" src="/scan/image" alt="Uploaded fundus photograph">
<div class="scan-name">{name}</div>
<div class="prediction-hero">{hero}</div>
<div class="prediction-sub">Confidence: {conf:.1}%</div>
<table class="prob-table">
  <thead><tr><th>Condition</th><th>Probability</th><th></th></tr></thead>
  <tbody>{rows}</tbody>
</table>
</div>"#,
        name = html_escape(&scan.image_name),
        hero = html_escape(prediction.class.display_name()),
        conf = prediction.confidence() * 100.0,
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use retinoscan::Prediction;

    #[test]
    fn content_type_sniffing() {
        assert_eq!(sniff_content_type(&[0x89, b'P', b'N', b'G', 0x0d]), "image/png");
        assert_eq!(sniff_content_type(&[0xff, 0xd8, 0xff]), "image/jpeg");
    }

    #[test]
    fn result_card_shows_all_four_bars() {
        let scan = ScanResult {
            image_name:  "eye.jpg".to_owned(),
            image_bytes: vec![0xff, 0xd8],
            prediction: Prediction {
                class: DiseaseClass::Cataract,
                probabilities: [0.7, 0.1, 0.1, 0.1],
            },
        };
        let html = build_result_card(&scan);
        for class in DiseaseClass::ALL {
            assert!(html.contains(class.display_name()), "missing {}", class.display_name());
        }
        assert!(html.contains("Confidence: 70.0%"));
        // Non-predicted classes are dimmed, the winner is not.
        assert_eq!(html.matches("bar-fill dim").count(), 3);
    }

    #[test]
    fn result_card_escapes_the_filename() {
        let scan = ScanResult {
            image_name:  "<script>x</script>.png".to_owned(),
            image_bytes: Vec::new(),
            prediction: Prediction {
                class: DiseaseClass::Normal,
                probabilities: [0.0, 0.0, 0.0, 1.0],
            },
        };
        let html = build_result_card(&scan);
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
