use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::error::{Result, ToolError};

/// Reads a text file, decoding it with the detected encoding.
///
/// A UTF-8 BOM is stripped. Valid UTF-8 is taken as is; anything else goes
/// through `chardetng` (GBK and Shift_JIS exports are common for word lists).
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| ToolError::io(path, e))?;
    Ok(decode(&bytes))
}

pub fn decode(bytes: &[u8]) -> String {
    // BOM UTF-8 (EF BB BF)
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let encoding = detect(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "decoding as {} produced replacement characters",
            encoding.name()
        );
    }
    text.into_owned()
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    tracing::debug!("detected encoding {}", encoding.name());
    encoding
}
