use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::display::{DisplayError, HttpFrameDisplay, ImageDisplay, PngDirectoryDisplay};
use crate::loss::loss_type::LossType;
use crate::math::backend::default_backend_name;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

/// Half-open row range `[start, end)` within the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> RowRange {
        RowRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where rendered frames go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayConfig {
    /// Browser viewer served at `addr`.
    Http { addr: String },
    /// Numbered PNG files under `path`.
    PngDirectory { path: PathBuf },
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig::Http {
            addr: "127.0.0.1:7879".into(),
        }
    }
}

impl DisplayConfig {
    pub fn open(&self) -> Result<Box<dyn ImageDisplay>, DisplayError> {
        Ok(match self {
            DisplayConfig::Http { addr } => Box::new(HttpFrameDisplay::bind(addr)?),
            DisplayConfig::PngDirectory { path } => Box::new(PngDirectoryDisplay::new(path)?),
        })
    }
}

/// Delays between showcase frames so a person can follow along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub hidden_unit_delay: Duration,
    pub reconstruction_delay: Duration,
}

impl Pacing {
    pub fn none() -> Pacing {
        Pacing {
            hidden_unit_delay: Duration::ZERO,
            reconstruction_delay: Duration::ZERO,
        }
    }
}

/// Settings for one demo run. Every field has a default, so a config file
/// only needs the values it changes.
///
/// ```json
/// {
///   "backend": "naive",
///   "epochs": 50,
///   "display": { "kind": "png_directory", "path": "frames" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Matrix backend name; `None` picks the platform default.
    pub backend: Option<String>,
    pub data_path: PathBuf,
    pub training_rows: RowRange,
    pub test_rows: RowRange,
    /// Test examples to reconstruct during the showcase.
    pub showcase_samples: usize,
    pub hidden_neurons: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    /// `None` trains full-batch.
    pub mini_batch_size: Option<usize>,
    pub loss: LossType,
    pub activation: ActivationFunction,
    pub hidden_unit_delay_ms: u64,
    pub reconstruction_delay_ms: u64,
    pub display: DisplayConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            backend: None,
            data_path: PathBuf::from("resources/mnist2500_X_custom.csv"),
            training_rows: RowRange::new(0, 500),
            test_rows: RowRange::new(1000, 2000),
            showcase_samples: 100,
            hidden_neurons: 200,
            epochs: 400,
            learning_rate: 0.1,
            mini_batch_size: None,
            loss: LossType::Mse,
            activation: ActivationFunction::Sigmoid,
            hidden_unit_delay_ms: 100,
            reconstruction_delay_ms: 1000,
            display: DisplayConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<DemoConfig, ConfigError> {
        let file = File::open(path).map_err(ConfigError::Io)?;
        serde_json::from_reader(BufReader::new(file)).map_err(ConfigError::Parse)
    }

    pub fn from_json_str(json: &str) -> Result<DemoConfig, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn backend_name(&self) -> String {
        self.backend
            .clone()
            .unwrap_or_else(|| default_backend_name().to_owned())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            hidden_unit_delay: Duration::from_millis(self.hidden_unit_delay_ms),
            reconstruction_delay: Duration::from_millis(self.reconstruction_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let config = DemoConfig::default();
        assert_eq!(config.training_rows.len(), 500);
        assert_eq!(config.test_rows, RowRange::new(1000, 2000));
        assert_eq!(config.showcase_samples, 100);
        assert_eq!(config.hidden_neurons, 200);
        assert_eq!(config.epochs, 400);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.pacing().hidden_unit_delay, Duration::from_millis(100));
        assert_eq!(config.pacing().reconstruction_delay, Duration::from_millis(1000));
        assert_eq!(config.backend_name(), default_backend_name());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = DemoConfig::from_json_str(
            r#"{
                "backend": "naive",
                "epochs": 5,
                "loss": "binary_cross_entropy",
                "display": { "kind": "png_directory", "path": "out/frames" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.backend_name(), "naive");
        assert_eq!(config.epochs, 5);
        assert_eq!(config.loss, LossType::BinaryCrossEntropy);
        assert_eq!(config.hidden_neurons, 200);
        assert_eq!(
            config.display,
            DisplayConfig::PngDirectory { path: PathBuf::from("out/frames") }
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            DemoConfig::from_json_str("{\"epochs\": \"many\"}"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DemoConfig::load_json("no/such/config.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
