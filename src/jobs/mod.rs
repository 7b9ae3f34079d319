use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::model::category::Category;
use crate::services::{audio, format, meanings, normalize, pokemon};

mod command;
pub use command::Command;

/// Runs one batch job to completion.
pub fn run(cmd: Command, config: &Config) -> Result<()> {
    match cmd {
        Command::Normalize => {
            let cfg = &config.normalize;
            normalize::run(&cfg.input, &cfg.output)?;
        }

        Command::Audio => {
            audio::run(&config.audio)?;
        }

        Command::Meanings => {
            let cfg = &config.meanings;
            meanings::run(&cfg.input, &cfg.output)?;
        }

        // best effort: errors are logged inside
        Command::Format => {
            let cfg = &config.format;
            format::run(&cfg.input, cfg.output.as_deref());
        }

        Command::Pokemon => pokemon::run(&config.pokemon, false)?,

        Command::FilterNames => {
            let path = config.pokemon.output_path(Category::Pokemon);
            pokemon::filter_names(&path)?;
        }

        Command::AllPokemon => pokemon::run(&config.pokemon, true)?,

        Command::Unknown => return Err(ToolError::InvalidInput(Command::USAGE.to_string())),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_reports_usage() {
        let err = run(Command::Unknown, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("usage: wordkit"));
    }

    #[test]
    fn format_job_never_fails() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let mut config = Config::default();
        config.format.input = temp.path().join("missing.json");

        assert!(run(Command::Format, &config).is_ok());
    }

    #[test]
    fn normalize_then_meanings_share_the_word_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let vocab = temp.path().join("vocab.json");
        std::fs::write(
            &vocab,
            r#"[{"word":"abate","translations":[{"translation":"减少；减弱（语气等）"}]},
                {"word":"lessen","translations":[{"translation":"减少, 变小"}]}]"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.normalize.input = vocab;
        config.normalize.output = temp.path().join("WordData.json");
        config.meanings.input = temp.path().join("WordData.json");
        config.meanings.output = temp.path().join("chinese_meanings.txt");

        run(Command::Normalize, &config).unwrap();
        run(Command::Meanings, &config).unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("chinese_meanings.txt")).unwrap(),
            "减少"
        );
    }
}
