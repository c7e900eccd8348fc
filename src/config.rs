use autoscaler::client::HttpClientConfig;
use autoscaler::logging::{DEFAULT_BACKUPS, DEFAULT_MAX_BYTES, RotationPolicy};
use autoscaler::scaler::{
    DEFAULT_MIN_REPLICAS, DEFAULT_POLL_INTERVAL, DEFAULT_STEP, DEFAULT_TARGET_CPU, DEFAULT_TOLERANCE,
    ScalerConfig,
};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub scaler: ScalerSection,
    pub http: HttpSection,
    pub log: LogSection,
    /// File this config was read from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerSection {
    pub base_url: Option<String>,
    pub target_cpu: f64,
    pub tolerance: f64,
    pub poll_interval_secs: u64,
    pub min_replicas: u32,
    pub step: u32,
    pub dry_run: bool,
}

impl Default for ScalerSection {
    fn default() -> Self {
        Self {
            base_url: None,
            target_cpu: DEFAULT_TARGET_CPU,
            tolerance: DEFAULT_TOLERANCE,
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            min_replicas: DEFAULT_MIN_REPLICAS,
            step: DEFAULT_STEP,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub timeout_ms: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub dir: PathBuf,
    pub file_name: String,
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(env!("CARGO_PKG_NAME"))
                .join("logs"),
            file_name: format!("{}.log", env!("CARGO_PKG_NAME")),
            max_bytes: DEFAULT_MAX_BYTES,
            backups: DEFAULT_BACKUPS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            scaler: ScalerSection::default(),
            http: HttpSection::default(),
            log: LogSection::default(),
            source: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Runs before the logger exists, so nothing here logs. A file that is
    /// present but unreadable or invalid is an error rather than being
    /// skipped; only missing files fall through to the next location.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        Self::load_first_existing(&Self::default_locations())
    }

    /// ~/.config/<project>/<project>.yml, then ./<project>.yml
    fn default_locations() -> Vec<PathBuf> {
        let project_name = env!("CARGO_PKG_NAME");
        let file_name = format!("{}.yml", project_name);

        let mut locations = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join(project_name).join(&file_name));
        }
        locations.push(PathBuf::from(file_name));
        locations
    }

    fn load_first_existing(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            if path.exists() {
                return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// Command-line flags take precedence over file values
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.scaler.base_url = Some(base_url.clone());
        }
        if let Some(target_cpu) = cli.target_cpu {
            self.scaler.target_cpu = target_cpu;
        }
        if let Some(tolerance) = cli.tolerance {
            self.scaler.tolerance = tolerance;
        }
        if let Some(interval) = cli.interval {
            self.scaler.poll_interval_secs = interval;
        }
        if let Some(min_replicas) = cli.min_replicas {
            self.scaler.min_replicas = min_replicas;
        }
        if let Some(step) = cli.step {
            self.scaler.step = step;
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.http.timeout_ms = timeout_ms;
        }
        if cli.dry_run {
            self.scaler.dry_run = true;
        }
        if cli.is_verbose() {
            self.log_level = Some("debug".to_string());
        }
    }

    /// Build the validated loop parameters
    pub fn scaler_config(&self) -> Result<ScalerConfig> {
        let base_url = self
            .scaler
            .base_url
            .clone()
            .ok_or_else(|| eyre!("base_url is required (use --base-url or set scaler.base_url)"))?;

        let config = ScalerConfig::new(base_url)
            .with_target_cpu(self.scaler.target_cpu)
            .with_tolerance(self.scaler.tolerance)
            .with_poll_interval(Duration::from_secs(self.scaler.poll_interval_secs))
            .with_min_replicas(self.scaler.min_replicas)
            .with_step(self.scaler.step)
            .with_dry_run(self.scaler.dry_run)
            .validate()?;

        Ok(config)
    }

    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::with_timeout(Duration::from_millis(self.http.timeout_ms))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log.dir.join(&self.log.file_name)
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_bytes: self.log.max_bytes,
            backups: self.log.backups,
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level(), "info");
        assert!(config.scaler.base_url.is_none());
        assert_eq!(config.scaler.target_cpu, 0.75);
        assert_eq!(config.scaler.tolerance, 0.05);
        assert_eq!(config.scaler.poll_interval_secs, 60);
        assert_eq!(config.scaler.min_replicas, 2);
        assert_eq!(config.scaler.step, 1);
        assert_eq!(config.http.timeout_ms, 5000);
        assert_eq!(config.log.file_name, "autoscaler.log");
        assert_eq!(config.rotation_policy(), RotationPolicy::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
scaler:
  base_url: http://target-app-url
  tolerance: 0.1
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scaler.base_url.as_deref(), Some("http://target-app-url"));
        assert_eq!(config.scaler.tolerance, 0.1);
        assert_eq!(config.scaler.target_cpu, 0.75);
        assert_eq!(config.http.timeout_ms, 5000);
        assert_eq!(config.log.backups, 3);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("autoscaler.yml");
        fs::write(
            &path,
            r#"
log_level: warn
scaler:
  base_url: http://app:8080
  poll_interval_secs: 15
log:
  dir: /var/log/autoscaler
  max_bytes: 1024
  backups: 5
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.scaler.poll_interval_secs, 15);
        assert_eq!(config.log_path(), PathBuf::from("/var/log/autoscaler/autoscaler.log"));
        assert_eq!(
            config.rotation_policy(),
            RotationPolicy {
                max_bytes: 1024,
                backups: 5
            }
        );
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "scaler: [not, a, map]").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_fallback_chain_broken_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("primary.yml");
        let valid = temp.path().join("fallback.yml");
        fs::write(&broken, "scaler:\n  target_cpu: [0.75\n").unwrap();
        fs::write(&valid, "scaler:\n  base_url: http://app\n").unwrap();

        let err = Config::load_first_existing(&[broken.clone(), valid]).unwrap_err();
        assert!(err.to_string().contains(&broken.display().to_string()), "{}", err);
    }

    #[test]
    fn test_fallback_chain_skips_missing_files() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        let valid = temp.path().join("fallback.yml");
        fs::write(&valid, "scaler:\n  base_url: http://app\n").unwrap();

        let config = Config::load_first_existing(&[missing, valid.clone()]).unwrap();
        assert_eq!(config.scaler.base_url.as_deref(), Some("http://app"));
        assert_eq!(config.source, Some(valid));
    }

    #[test]
    fn test_fallback_chain_defaults_when_nothing_exists() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_first_existing(&[temp.path().join("a.yml"), temp.path().join("b.yml")]).unwrap();
        assert!(config.source.is_none());
        assert_eq!(config.scaler.target_cpu, 0.75);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = Config::default();
        config.scaler.base_url = Some("http://from-file".to_string());
        config.scaler.min_replicas = 4;

        let cli = Cli::try_parse_from([
            "autoscaler",
            "-u",
            "http://from-cli",
            "--interval",
            "5",
            "--timeout-ms",
            "750",
            "--dry-run",
            "-v",
        ])
        .unwrap();
        config.apply_cli(&cli);

        assert_eq!(config.scaler.base_url.as_deref(), Some("http://from-cli"));
        assert_eq!(config.scaler.poll_interval_secs, 5);
        assert_eq!(config.scaler.min_replicas, 4);
        assert!(config.scaler.dry_run);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.http_config().timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_scaler_config_requires_base_url() {
        let err = Config::default().scaler_config().unwrap_err();
        assert!(err.to_string().contains("base_url is required"));
    }

    #[test]
    fn test_scaler_config_validates_ranges() {
        let mut config = Config::default();
        config.scaler.base_url = Some("http://app".to_string());
        config.scaler.target_cpu = 7.5;
        assert!(config.scaler_config().is_err());
    }

    #[test]
    fn test_scaler_config_built_from_sections() {
        let mut config = Config::default();
        config.scaler.base_url = Some("http://app".to_string());
        config.scaler.poll_interval_secs = 10;

        let scaler = config.scaler_config().unwrap();
        assert_eq!(scaler.base_url, "http://app");
        assert_eq!(scaler.poll_interval, Duration::from_secs(10));
        assert_eq!(scaler.min_replicas, 2);
    }
}
