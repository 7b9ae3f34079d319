use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Result, ToolError};
use crate::services::encoding;

/// Indentation used by the word-list files.
pub const WIDE_INDENT: &[u8] = b"    ";
/// Indentation used by caches and game data.
pub const NARROW_INDENT: &[u8] = b"  ";

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = encoding::read_text(path)?;
    serde_json::from_str(&text).map_err(|e| ToolError::json(path, e))
}

/// Serializes with the given indent. Non-ASCII text is written as is.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T, indent: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(ToolError::Serialize)?;

    String::from_utf8(buf).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, indent: &[u8]) -> Result<()> {
    let json = to_pretty_string(value, indent)?;
    write_atomic(path, json.as_bytes())
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ToolError::io(parent, e))?;
        }
    }

    fs::write(&tmp, bytes).map_err(|e| ToolError::io(&tmp, e))?;

    // rename replaces the target in one step; it is never removed first
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ToolError::io(path, e));
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "wordkit".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
