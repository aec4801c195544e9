//! Minimal multipart/form-data parsing for the upload form.
//!
//! The clinic has exactly one multipart form (the fundus photograph upload),
//! so this handles just what that needs: locating the boundary, pulling the
//! bytes of a named file field, and recovering the original filename.

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// Extracts the raw bytes of the file part named `field_name` from a
/// multipart/form-data body. Returns `None` if absent or malformed.
pub fn file_part(body: &[u8], boundary: &str, field_name: &str) -> Option<Vec<u8>> {
    for part in parts(body, boundary) {
        // Pieces before the first and after the last boundary have no header
        // block; skip them.
        let Some((headers, data)) = split_part(part) else { continue };
        if headers.contains(&format!("name=\"{}\"", field_name)) && headers.contains("filename=") {
            return Some(data.to_vec());
        }
    }
    None
}

/// Extracts the `filename="..."` value of the file part named `field_name`.
pub fn file_part_filename(body: &[u8], boundary: &str, field_name: &str) -> Option<String> {
    for part in parts(body, boundary) {
        let Some((headers, _)) = split_part(part) else { continue };
        if !headers.contains(&format!("name=\"{}\"", field_name)) {
            continue;
        }
        let key = "filename=\"";
        if let Some(pos) = headers.find(key) {
            let rest = &headers[pos + key.len()..];
            if let Some(end) = rest.find('"') {
                return Some(rest[..end].to_owned());
            }
        }
    }
    None
}

/// Splits the body into parts delimited by `--boundary`.
fn parts<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{}", boundary);
    split_on(body, delimiter.as_bytes())
}

/// Splits one part into its header block (as text) and payload bytes,
/// trimming the trailing CRLF the boundary format requires.
fn split_part(part: &[u8]) -> Option<(String, &[u8])> {
    let sep = b"\r\n\r\n";
    let sep_pos = find_subsequence(part, sep)?;
    let headers = String::from_utf8_lossy(&part[..sep_pos]).into_owned();
    let raw = &part[sep_pos + sep.len()..];
    let data = raw.strip_suffix(b"\r\n").unwrap_or(raw);
    Some((headers, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----TestBoundary42";

    fn body_with_file(field: &str, filename: &str, payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[test]
    fn boundary_is_extracted_from_content_type() {
        let ct = format!("multipart/form-data; boundary={}", BOUNDARY);
        assert_eq!(extract_boundary(&ct).as_deref(), Some(BOUNDARY));
        assert_eq!(extract_boundary("text/plain"), None);
    }

    #[test]
    fn quoted_boundary_is_unquoted() {
        let ct = "multipart/form-data; boundary=\"abc123\"";
        assert_eq!(extract_boundary(ct).as_deref(), Some("abc123"));
    }

    #[test]
    fn named_file_part_round_trips() {
        let payload = b"\x89PNG\r\n\x1a\nfake-pixels";
        let body = body_with_file("fundus_image", "right_eye.png", payload);
        assert_eq!(file_part(&body, BOUNDARY, "fundus_image").as_deref(), Some(&payload[..]));
        assert_eq!(file_part(&body, BOUNDARY, "other_field"), None);
    }

    #[test]
    fn filename_is_recovered() {
        let body = body_with_file("fundus_image", "right_eye.png", b"data");
        assert_eq!(
            file_part_filename(&body, BOUNDARY, "fundus_image").as_deref(),
            Some("right_eye.png")
        );
    }

    #[test]
    fn find_subsequence_basics() {
        assert_eq!(find_subsequence(b"abcdef", b"cd"), Some(2));
        assert_eq!(find_subsequence(b"abcdef", b"xy"), None);
        assert_eq!(find_subsequence(b"abc", b""), Some(0));
    }
}
