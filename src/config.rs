use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    /// Dump each parsed tree to stderr before evaluating it.
    pub print_tree: bool,
    /// Log a warning for every pipeline stage but the last that exits non-zero.
    pub warn_upstream: bool,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLoader::default_config()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub const ENV_VAR: &'static str = "PIPESH_CONFIG";
    pub const RC_FILE: &'static str = ".pipeshrc";

    pub fn default_config() -> Config {
        Config {
            prompt: "$ ".to_string(),
            print_tree: false,
            warn_upstream: true,
        }
    }

    /// `$PIPESH_CONFIG` if set, otherwise `~/.pipeshrc`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(Self::ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        std::env::var_os("HOME").map(|home| Path::new(&home).join(Self::RC_FILE))
    }

    /// Loads the default config file, falling back to defaults when it does
    /// not exist.
    pub fn load() -> Result<Config, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(path),
            _ => Ok(Self::default_config()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path)?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno + 1, line)));
            };

            match key.trim() {
                // The prompt keeps its surrounding whitespace.
                "prompt" => config.prompt = value.to_string(),
                "print_tree" => config.print_tree = parse_bool(value.trim(), lineno)?,
                "warn_upstream" => config.warn_upstream = parse_bool(value.trim(), lineno)?,
                other => {
                    return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno + 1, other)));
                }
            }
        }

        Ok(config)
    }
}

fn parse_bool(value: &str, lineno: usize) -> Result<bool, ConfigError> {
    match value {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::Parse(format!("Line {}: Invalid bool: {}", lineno + 1, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_source_is_default() {
        assert_eq!(ConfigLoader::load_from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_str() {
        let src = "# comment\nprompt=pipesh> \nprint_tree = yes\nwarn_upstream=off\n";
        let config = ConfigLoader::load_from_str(src).unwrap();
        assert_eq!(config.prompt, "pipesh> ");
        assert!(config.print_tree);
        assert!(!config.warn_upstream);
    }

    #[test]
    fn test_unknown_key() {
        let err = ConfigLoader::load_from_str("history_max=10").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: Line 1: Unknown key: history_max");
    }

    #[test]
    fn test_missing_equals() {
        let err = ConfigLoader::load_from_str("\nprint_tree").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.starts_with("Line 2")));
    }

    #[test]
    fn test_bad_bool() {
        assert!(ConfigLoader::load_from_str("print_tree=maybe").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "print_tree=true").unwrap();
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert!(config.print_tree);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::load_from_file("/definitely/not/here/.pipeshrc").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
