use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::services::json_io::{self, WIDE_INDENT};

pub fn format_file(input: &Path, output: &Path) -> Result<()> {
    let value: Value = json_io::read_json(input)?;
    json_io::write_json(output, &value, WIDE_INDENT)
}

/// Best effort: failures are logged, never propagated.
pub fn run(input: &Path, output: Option<&Path>) -> bool {
    let output = output.unwrap_or(input);

    match format_file(input, output) {
        Ok(()) => {
            tracing::info!("formatted {}", output.display());
            true
        }
        Err(e) => {
            tracing::error!("failed to format {}: {e}", input.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_place_with_four_spaces_and_key_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("data.json");
        std::fs::write(&path, r#"{"z":1,"a":{"word":"减少"},"list":[]}"#).unwrap();

        assert!(run(&path, None));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\n    \"z\": 1,\n    \"a\": {\n        \"word\": \"减少\"\n    },\n    \"list\": []\n}"
        );
    }

    #[test]
    fn writes_to_separate_output_when_given() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = temp.path().join("in.json");
        let output = temp.path().join("out.json");
        std::fs::write(&input, "[1,2]").unwrap();

        assert!(run(&input, Some(&output)));
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "[1,2]");
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "[\n    1,\n    2\n]"
        );
    }

    #[test]
    fn errors_are_swallowed() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{oops").unwrap();

        assert!(!run(&path, None));
        assert!(!run(&temp.path().join("missing.json"), None));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{oops");
    }
}
