use std::path::PathBuf;

/// Backing file used when none is configured.
pub const DEFAULT_FILE: &str = "file.json";

/// Prompt shown before each interactive line.
pub const DEFAULT_PROMPT: &str = "(hbnb) ";

/// Settings for one console session.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding every stored entity.
    pub file: PathBuf,
    pub prompt: String,
    /// Lines to execute instead of reading stdin.
    pub commands: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            prompt: DEFAULT_PROMPT.to_string(),
            commands: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.file, PathBuf::from("file.json"));
        assert_eq!(config.prompt, "(hbnb) ");
        assert!(config.commands.is_empty());
    }
}
