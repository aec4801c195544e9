/// Template renderer for the retinoscan clinic.
///
/// The clinic is a single page (`clinic/assets/clinic.html`) with placeholder
/// tokens like `{{TOKEN}}`, loaded at compile time. `render_page` accepts a
/// closure that substitutes the dynamic sections; any token the closure does
/// not fill is blanked so raw `{{TOKEN}}` strings never reach the browser.

const TEMPLATE: &str = include_str!("assets/clinic.html");

/// Renders the clinic page, letting the caller fill the dynamic sections
/// (flash banner, result card, download affordance).
pub fn render_page<F>(fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    blank_remaining(fill(TEMPLATE.to_owned()))
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't substituted with an empty
/// string, so a missed token produces a clean page rather than leaking
/// template internals.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

/// Escapes text for safe interpolation into HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfilled_tokens_are_blanked() {
        let html = blank_remaining("a {{LEFTOVER}} b {{ANOTHER_ONE}} c".to_owned());
        assert_eq!(html, "a  b  c");
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(html_escape(r#"<img src="x" & more>"#), "&lt;img src=&quot;x&quot; &amp; more&gt;");
    }
}
