//! Text decoding helpers shared by the tag decoder and the metadata reader.

use std::borrow::Cow;

/// Decode a UTF-16LE run as stored in LRF string tags and text streams.
///
/// Unpaired surrogates and a trailing odd byte become U+FFFD.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let (text, _malformed) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encode a string as UTF-16LE, the inverse of [`decode_utf16le`].
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Replace characters that cannot appear in a file name.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Decode the metadata XML block.
///
/// This function:
/// 1. Honours a byte-order mark (the book-info block is usually UTF-16LE with BOM)
/// 2. Tries UTF-8
/// 3. Tries the hint encoding (from `<?xml encoding="..."?>`)
/// 4. Falls back to Windows-1252
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (result, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return result;
    }

    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract encoding from an XML declaration in the first 100 bytes.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;

    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16le_roundtrip_with_non_bmp() {
        let text = "Zoë 𝄞";
        assert_eq!(decode_utf16le(&encode_utf16le(text)), text);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Serif/Bold: \"Wide\""), "Serif_Bold_ _Wide_");
        assert_eq!(sanitize_file_name("a\\b\tc"), "a_b_c");
        assert_eq!(sanitize_file_name("Dummy Sans"), "Dummy Sans");
    }

    #[test]
    fn test_decode_utf16le_odd_length() {
        assert_eq!(decode_utf16le(&[0x41, 0x00, 0x42]), "A\u{FFFD}");
    }

    #[test]
    fn test_decode_text_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(encode_utf16le("<Info/>"));
        assert_eq!(decode_text(&bytes, None), "<Info/>");
    }

    #[test]
    fn test_decode_text_latin1_fallback() {
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes, None), "café");
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "café");
    }

    #[test]
    fn test_extract_xml_encoding() {
        let bytes = br#"<?xml version="1.0" encoding='UTF-16'?><Info/>"#;
        assert_eq!(extract_xml_encoding(bytes), Some("UTF-16"));
        assert_eq!(extract_xml_encoding(b"<Info/>"), None);
    }
}
