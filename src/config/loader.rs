use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::PreflightConfig;
use crate::errors::{PreflightError, Result};

pub const CONFIG_FILE_NAME: &str = ".preflight.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<PreflightConfig, String> {
    let config = toml::from_str::<PreflightConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    validate_globs(&config)?;
    Ok(config)
}

fn validate_globs(config: &PreflightConfig) -> std::result::Result<(), String> {
    let consistency = &config.consistency;
    let globs = config
        .scan
        .model_globs
        .iter()
        .chain(config.scan.endpoint_globs.iter())
        .chain(consistency.route_globs.iter())
        .chain([
            &consistency.pii_glob,
            &consistency.upload_glob,
            &consistency.logging_glob,
            &consistency.implementation_glob,
        ]);

    for pattern in globs {
        glob::Pattern::new(pattern).map_err(|e| format!("Invalid glob '{}': {}", pattern, e))?;
    }
    Ok(())
}

/// Load an explicitly requested config file; every failure is an error.
pub fn load_config_from(path: &Path) -> Result<PreflightConfig> {
    let contents = read_config_file(path)
        .map_err(|err| PreflightError::config_with_path(err.to_string(), path))?;
    parse_and_validate_config(&contents).map_err(|e| PreflightError::config_with_path(e, path))
}

/// Try loading config from a specific path, returning `None` when absent.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Result<Option<PreflightConfig>> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            log::warn!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            );
            return Err(PreflightError::config_with_path(e.to_string(), config_path));
        }
    };

    let config = parse_and_validate_config(&contents)
        .map_err(|e| PreflightError::config_with_path(e, config_path))?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(Some(config))
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.preflight.toml`.
///
/// A config that exists but cannot be parsed is an error rather than a
/// silent fallback to defaults.
pub fn load_config(start: &Path) -> Result<PreflightConfig> {
    for dir in directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH) {
        if let Some(config) = try_load_config_from_path(&dir.join(CONFIG_FILE_NAME))? {
            return Ok(config);
        }
    }

    log::debug!(
        "No config found after checking {} directories. Using default config.",
        MAX_TRAVERSAL_DEPTH
    );
    Ok(PreflightConfig::default())
}
