//! User configuration (`config.toml` in the platform config dir).
//!
//! ```toml
//! workbook = "/home/me/sheets/club"
//! default_sheet = "People"
//! missing_column = "match-nothing"   # or "match-any-column"
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use sheetql_core::MissingColumn;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    workbook: Option<PathBuf>,
    default_sheet: Option<String>,
    missing_column: Option<MissingColumn>,
}

/// Settings after merging the config file with built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub workbook: Option<PathBuf>,
    pub default_sheet: Option<String>,
    pub missing_column: MissingColumn,
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("me", "shoryuken", "sheetql")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load configuration from `explicit`, or the user config file if present.
///
/// Problems are returned as warnings and never stop the program; the
/// affected settings fall back to their defaults.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let path = explicit.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = path else {
        return (Config::default(), warnings);
    };
    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let file = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    let file = file.unwrap_or_default();
    let config = Config {
        workbook: file.workbook,
        default_sheet: file.default_sheet.filter(|s| !s.trim().is_empty()),
        missing_column: file.missing_column.unwrap_or_default(),
    };
    (config, warnings)
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str::<ConfigFile>(content)
}
