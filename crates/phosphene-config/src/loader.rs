// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, PhospheneConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the phosphene configuration file
///
/// Search order:
/// 1. `PHOSPHENE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./phosphene_configuration.toml`
/// 3. Parent directories (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("PHOSPHENE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by PHOSPHENE_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet PHOSPHENE_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Value ranges are checked separately by [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PhospheneConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: PhospheneConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `PHOSPHENE_SIGMA` -> `simulator.sigma` and `pipeline.sigma`
/// - `PHOSPHENE_JITTER` -> `simulator.jitter`
/// - `PHOSPHENE_INTENSITY_VAR` -> `simulator.intensity_var`
/// - `PHOSPHENE_APERTURE` -> `simulator.aperture`
/// - `PHOSPHENE_SEED` -> `simulator.seed`
/// - `PHOSPHENE_MODE` -> `pipeline.initial_mode`
/// - `PHOSPHENE_LOG_LEVEL` -> `logging.level`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut PhospheneConfig) {
    if let Some(sigma) = env_parse::<f32>("PHOSPHENE_SIGMA") {
        set_sigma(config, sigma);
    }
    if let Some(jitter) = env_parse::<f32>("PHOSPHENE_JITTER") {
        config.simulator.jitter = jitter;
    }
    if let Some(intensity_var) = env_parse::<f32>("PHOSPHENE_INTENSITY_VAR") {
        config.simulator.intensity_var = intensity_var;
    }
    if let Some(aperture) = env_parse::<f32>("PHOSPHENE_APERTURE") {
        config.simulator.aperture = aperture;
    }
    if let Some(seed) = env_parse::<u64>("PHOSPHENE_SEED") {
        config.simulator.seed = Some(seed);
    }
    if let Ok(value) = env::var("PHOSPHENE_MODE") {
        config.pipeline.initial_mode = value.to_lowercase();
    }
    if let Ok(value) = env::var("PHOSPHENE_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"sigma": "1.2", "mode": "high"}`)
///
/// Keys map like the environment variables above; `sigma` sets both blur
/// sigmas. Unlike environment overrides, a CLI value that fails to parse is
/// reported as `ConfigError::InvalidValue`.
pub fn apply_cli_overrides(
    config: &mut PhospheneConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("sigma") {
        set_sigma(config, parse_cli("sigma", value)?);
    }
    if let Some(value) = cli_args.get("jitter") {
        config.simulator.jitter = parse_cli("jitter", value)?;
    }
    if let Some(value) = cli_args.get("intensity_var") {
        config.simulator.intensity_var = parse_cli("intensity_var", value)?;
    }
    if let Some(value) = cli_args.get("aperture") {
        config.simulator.aperture = parse_cli("aperture", value)?;
    }
    if let Some(value) = cli_args.get("seed") {
        config.simulator.seed = Some(parse_cli("seed", value)?);
    }
    if let Some(value) = cli_args.get("mode") {
        config.pipeline.initial_mode = value.to_lowercase();
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    Ok(())
}

/// Blur sigma for every simulator built from `config`
fn set_sigma(config: &mut PhospheneConfig, sigma: f32) {
    config.simulator.sigma = sigma;
    config.pipeline.sigma = sigma;
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}

fn parse_cli<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        ConfigError::InvalidValue(format!("cannot parse '{}' for CLI override '{}'", value, key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: &[&str] = &[
        "PHOSPHENE_SIGMA",
        "PHOSPHENE_JITTER",
        "PHOSPHENE_INTENSITY_VAR",
        "PHOSPHENE_APERTURE",
        "PHOSPHENE_SEED",
        "PHOSPHENE_MODE",
        "PHOSPHENE_LOG_LEVEL",
    ];

    fn clear_override_vars() {
        for key in OVERRIDE_VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("PHOSPHENE_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("PHOSPHENE_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing_file() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("does_not_exist.toml");

        env::set_var("PHOSPHENE_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("PHOSPHENE_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulator]").unwrap();
        writeln!(file, "resolution = [26, 26]").unwrap();
        writeln!(file, "seed = 42").unwrap();
        writeln!(file, "[edges]").unwrap();
        writeln!(file, "high_threshold = 90.0").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.simulator.resolution, [26, 26]);
        assert_eq!(config.simulator.seed, Some(42));
        assert_eq!(config.edges.high_threshold, 90.0);
        assert_eq!(config.edges.low_threshold, 35.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("missing.toml");
        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = PhospheneConfig::default();

        env::set_var("PHOSPHENE_SIGMA", "1.5");
        env::set_var("PHOSPHENE_SEED", "1234");
        env::set_var("PHOSPHENE_MODE", "HIGH");
        env::set_var("PHOSPHENE_JITTER", "not-a-number");

        apply_environment_overrides(&mut config);
        clear_override_vars();

        assert_eq!(config.simulator.sigma, 1.5);
        assert_eq!(config.pipeline.sigma, 1.5);
        assert_eq!(config.simulator.seed, Some(1234));
        assert_eq!(config.pipeline.initial_mode, "high");
        // Unparseable values leave the default in place
        assert_eq!(config.simulator.jitter, 0.35);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PhospheneConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("aperture".to_string(), "0.5".to_string());
        cli_args.insert("mode".to_string(), "low".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.simulator.aperture, 0.5);
        assert_eq!(config.pipeline.initial_mode, "low");
    }

    #[test]
    fn test_cli_sigma_reaches_both_sections() {
        let mut config = PhospheneConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("sigma".to_string(), "2.5".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.simulator.sigma, 2.5);
        assert_eq!(config.pipeline.sigma, 2.5);
    }

    #[test]
    fn test_cli_override_rejects_garbage() {
        let mut config = PhospheneConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("sigma".to_string(), "wide".to_string());

        let result = apply_cli_overrides(&mut config, &cli_args);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        // CLI overrides take precedence over environment variables
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulator]").unwrap();
        writeln!(file, "sigma = 0.5").unwrap();
        writeln!(file, "jitter = 0.1").unwrap();

        env::set_var("PHOSPHENE_SIGMA", "2.0");
        env::set_var("PHOSPHENE_JITTER", "0.2");

        let mut cli_args = HashMap::new();
        cli_args.insert("sigma".to_string(), "3.0".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_override_vars();

        // CLI wins for sigma, env wins for jitter (no CLI override)
        assert_eq!(config.simulator.sigma, 3.0);
        assert_eq!(config.pipeline.sigma, 3.0);
        assert_eq!(config.simulator.jitter, 0.2);
    }
}
