//! Placeholder image URLs for `Image` elements with no source.
//!
//! Grounded on `api/placeholder.py`: a short, hosted URL rather than an
//! inline base64 data URL, which is what the request-builder contract
//! in spec §6 requires ("under 2048 bytes, never inline base64").

/// Builds a `https://placehold.co/...` URL for an image placeholder of
/// the given pixel dimensions and label text. Pure, no network access.
pub fn placeholder_image_url(width: u32, height: u32, text: &str) -> String {
    const BG_COLOR: &str = "E2E8F0";
    const TEXT_COLOR: &str = "94A3B8";

    let width = width.max(1);
    let height = height.max(1);
    let encoded_text = percent_encode(text);

    format!(
        "https://placehold.co/{width}x{height}/{BG_COLOR}/{TEXT_COLOR}/png?text={encoded_text}"
    )
}

/// Minimal percent-encoding sufficient for placeholder label text (no
/// external URL-encoding dependency needed for this narrow use).
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
