use dieta_core::{DailyTargets, DemoWindow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "dieta";
const ENV_DATA_DIR: &str = "DIETA_DATA_DIR";
const ENV_LANGUAGE: &str = "DIETA_LANGUAGE";

/// Where a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved setting and its origin
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            source: ConfigSource::Default,
        }
    }

    /// Replaces the value, recording the layer that supplied it.
    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Resolved CLI configuration. Layers: defaults, then the YAML file,
/// then `DIETA_*` environment variables.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding one JSON file per store key
    pub data_dir: ConfigValue<PathBuf>,
    /// Display language; overrides the stored app setting when not default
    pub language: ConfigValue<String>,
    /// Daily nutrition targets used by the dashboard
    pub targets: ConfigValue<DailyTargets>,
    /// Days generated around today by `demo enable`
    pub demo: ConfigValue<DemoWindow>,
    /// YAML file that was read, if one existed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// On-disk shape. Every key is optional; nested sections may be partial.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct FileLayer {
    data_dir: Option<PathBuf>,
    language: Option<String>,
    targets: Option<TargetsLayer>,
    demo: Option<DemoLayer>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TargetsLayer {
    calories: Option<f64>,
    proteins: Option<f64>,
    carbs: Option<f64>,
    fats: Option<f64>,
}

impl TargetsLayer {
    fn over(self, base: DailyTargets) -> DailyTargets {
        DailyTargets {
            calories: self.calories.unwrap_or(base.calories),
            proteins: self.proteins.unwrap_or(base.proteins),
            carbs: self.carbs.unwrap_or(base.carbs),
            fats: self.fats.unwrap_or(base.fats),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct DemoLayer {
    past_days: Option<u32>,
    future_days: Option<u32>,
}

impl DemoLayer {
    fn over(self, base: DemoWindow) -> DemoWindow {
        DemoWindow {
            past_days: self.past_days.unwrap_or(base.past_days),
            future_days: self.future_days.unwrap_or(base.future_days),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: ConfigValue::default_value(Self::default_data_dir()),
            language: ConfigValue::default_value("it".to_string()),
            targets: ConfigValue::default_value(DailyTargets::default()),
            demo: ConfigValue::default_value(DemoWindow::default()),
            config_file: None,
        }
    }
}

impl Config {
    /// Resolves the configuration from `config_path` (or the platform
    /// default) and the process environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or_else(Self::default_config_path);
        Self::resolve(&path, |name| std::env::var(name).ok())
    }

    fn resolve(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let layer: FileLayer =
                serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            config.apply_file(path, layer)?;
        }

        if let Some(dir) = env(ENV_DATA_DIR) {
            config.data_dir.set(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(lang) = env(ENV_LANGUAGE) {
            config.language.set(lang, ConfigSource::Environment);
        }

        Ok(config)
    }

    fn apply_file(&mut self, path: &Path, layer: FileLayer) -> Result<(), ConfigError> {
        self.config_file = Some(path.to_path_buf());

        if let Some(dir) = layer.data_dir {
            // Relative data dirs are anchored at the config file's directory.
            let dir = match path.parent() {
                Some(parent) if dir.is_relative() => parent.join(dir),
                _ => dir,
            };
            self.data_dir.set(dir, ConfigSource::File);
        }
        if let Some(lang) = layer.language {
            self.language.set(lang, ConfigSource::File);
        }
        if let Some(targets) = layer.targets {
            let targets = targets.over(self.targets.value);
            check_targets(&targets).map_err(|reason| ConfigError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;
            self.targets.set(targets, ConfigSource::File);
        }
        if let Some(demo) = layer.demo {
            let demo = demo.over(self.demo.value);
            demo.validate().map_err(|reason| ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: format!("demo.{}", reason),
            })?;
            self.demo.set(demo, ConfigSource::File);
        }
        Ok(())
    }

    /// Language to display: explicit config wins, otherwise the stored setting.
    pub fn effective_language(&self, stored: &str) -> String {
        match self.language.source {
            ConfigSource::Default => stored.to_string(),
            _ => self.language.value.clone(),
        }
    }

    /// `<platform config dir>/dieta`, e.g. `~/.config/dieta` on Linux.
    pub fn default_config_dir() -> PathBuf {
        platform_dir(dirs::config_dir())
    }

    /// `<platform data dir>/dieta`, e.g. `~/.local/share/dieta` on Linux.
    pub fn default_data_dir() -> PathBuf {
        platform_dir(dirs::data_dir())
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn platform_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

fn check_targets(targets: &DailyTargets) -> Result<(), String> {
    let fields = [
        ("calories", targets.calories),
        ("proteins", targets.proteins),
        ("carbs", targets.carbs),
        ("fats", targets.fats),
    ];
    match fields
        .iter()
        .find(|(_, value)| !(value.is_finite() && *value > 0.0))
    {
        Some((name, _)) => Err(format!("targets.{} must be a positive number", name)),
        None => Ok(()),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    Invalid {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Cannot read config file '{}': {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Cannot parse config file '{}': {}", path.display(), source)
            }
            ConfigError::Invalid { path, reason } => {
                write!(f, "Invalid config file '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}
