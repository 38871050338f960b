use log::warn;

/// Best-effort text extraction from an uploaded document.
///
/// PDF-like kinds go through the PDF extractor, falling back to a lossy UTF-8
/// decode of the raw bytes when extraction fails. Every other kind is decoded
/// as text directly, lossy for binary formats (accepted limitation).
pub fn document_text(bytes: &[u8], file_type: Option<&str>) -> String {
    match file_type {
        Some(kind) if kind.contains("pdf") => match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("PDF extraction failed, decoding raw bytes: {}", e);
                String::from_utf8_lossy(bytes).into_owned()
            }
        },
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = document_text(b"heat flows downhill", Some("text/plain"));
        assert_eq!(text, "heat flows downhill");
    }

    #[test]
    fn test_no_kind_decodes_raw_bytes() {
        let text = document_text(b"no type given", None);
        assert_eq!(text, "no type given");
    }

    #[test]
    fn test_invalid_pdf_falls_back_to_raw_decode() {
        let text = document_text(b"not actually a pdf", Some("application/pdf"));
        assert_eq!(text, "not actually a pdf");
    }

    #[test]
    fn test_binary_decodes_lossily() {
        let text = document_text(&[0x66, 0xff, 0x6f], Some("application/octet-stream"));
        assert_eq!(text, "f\u{fffd}o");
    }
}
