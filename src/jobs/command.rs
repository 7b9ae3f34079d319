#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Normalize,
    Audio,
    Meanings,
    Format,
    Pokemon,
    FilterNames,
    AllPokemon,
    Unknown,
}

impl Command {
    pub const USAGE: &'static str =
        "usage: wordkit <normalize|audio|meanings|format|pokemon|filter-names|all-pokemon>";
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "normalize" => Command::Normalize,
            "audio" => Command::Audio,
            "meanings" => Command::Meanings,
            "format" => Command::Format,
            "pokemon" => Command::Pokemon,
            "filter-names" => Command::FilterNames,
            "all-pokemon" => Command::AllPokemon,
            _ => Command::Unknown,
        }
    }
}
