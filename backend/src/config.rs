use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse classifier config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid classifier config: {0}")]
    Invalid(String),
}

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub classifier_config: PathBuf,
    pub frontend_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingVar("JWT_SECRET"))?;

        Ok(Self {
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", lookup("PORT"), 8081)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://leafscan.db?mode=rwc".to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_or(
                "JWT_EXPIRATION_HOURS",
                lookup("JWT_EXPIRATION_HOURS"),
                24,
            )?,
            classifier_config: lookup("CLASSIFIER_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config/classifier.yaml")),
            frontend_dir: lookup("FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("frontend/dist")),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                lookup("MAX_UPLOAD_BYTES"),
                10 * 1024 * 1024,
            )?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Memory order of the input tensor handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    #[default]
    Nhwc,
    Nchw,
}

/// Thresholds of the maize-leaf plausibility check. Hue is in degrees,
/// saturation and value in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafConfig {
    pub min_aspect_ratio: f32,
    pub hue_range: (f32, f32),
    pub min_saturation: f32,
    pub min_value: f32,
    pub min_green_fraction: f32,
}

impl Default for LeafConfig {
    fn default() -> Self {
        Self {
            min_aspect_ratio: 1.2,
            hue_range: (50.0, 170.0),
            min_saturation: 0.16,
            min_value: 0.16,
            min_green_fraction: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
    #[serde(default)]
    pub layout: TensorLayout,
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub class_labels: Vec<String>,
    #[serde(default)]
    pub leaf: LeafConfig,
}

fn default_input_size() -> u32 {
    128
}

fn default_scale() -> f32 {
    1.0
}

impl ClassifierConfig {
    /// Reads the YAML file and resolves a relative `model_path` against the
    /// directory holding it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_yaml(&raw)?;
        if config.model_path.is_relative() {
            if let Some(parent) = path.parent() {
                config.model_path = parent.join(&config.model_path);
            }
        }
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: ClassifierConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.input_size == 0 {
            return Err(ConfigError::Invalid("input_size must be positive".into()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::Invalid("scale must be a positive number".into()));
        }
        validate_labels(&self.class_labels)?;

        let leaf = &self.leaf;
        if leaf.min_aspect_ratio <= 0.0 {
            return Err(ConfigError::Invalid("leaf.min_aspect_ratio must be positive".into()));
        }
        let (low, high) = leaf.hue_range;
        if !(0.0..=360.0).contains(&low) || !(0.0..=360.0).contains(&high) || low > high {
            return Err(ConfigError::Invalid(format!(
                "leaf.hue_range must be an ascending pair within 0..360, got ({}, {})",
                low, high
            )));
        }
        for (name, value) in [
            ("leaf.min_saturation", leaf.min_saturation),
            ("leaf.min_value", leaf.min_value),
            ("leaf.min_green_fraction", leaf.min_green_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{} must be within 0..1", name)));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_labels(labels: &[String]) -> Result<(), ConfigError> {
    if labels.is_empty() {
        return Err(ConfigError::Invalid("class_labels must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for label in labels {
        if label.trim().is_empty() {
            return Err(ConfigError::Invalid("class labels must not be blank".into()));
        }
        if !seen.insert(label.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate class label: {}", label)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_defaults_apply() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.jwt_expiration_hours, 24);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.classifier_config, PathBuf::from("config/classifier.yaml"));
    }

    #[test]
    fn env_requires_jwt_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("JWT_SECRET")));
    }

    #[test]
    fn env_rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "PORT", .. }));
    }

    #[test]
    fn yaml_fills_defaults() {
        let config = ClassifierConfig::from_yaml(
            "model_path: model.pt\nclass_labels: [a, b]\n",
        )
        .unwrap();
        assert_eq!(config.input_size, 128);
        assert_eq!(config.layout, TensorLayout::Nhwc);
        assert_eq!(config.resize_filter, ResizeFilter::Nearest);
        assert_eq!(config.leaf, LeafConfig::default());
    }

    #[test]
    fn yaml_rejects_duplicate_labels() {
        let err = ClassifierConfig::from_yaml("model_path: m.pt\nclass_labels: [a, a]\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn yaml_rejects_empty_labels() {
        let err =
            ClassifierConfig::from_yaml("model_path: m.pt\nclass_labels: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn yaml_rejects_inverted_hue_band() {
        let raw = "model_path: m.pt\nclass_labels: [a]\nleaf:\n  hue_range: [170.0, 50.0]\n";
        assert!(ClassifierConfig::from_yaml(raw).is_err());
    }

    #[test]
    fn shipped_config_is_valid() {
        let raw = include_str!("../../config/classifier.yaml");
        let config = ClassifierConfig::from_yaml(raw).unwrap();
        assert!(config.class_labels.len() >= 2);
    }
}
