use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::TaskKind;

/// Evaluation run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Task variant the checkpoint was trained for
    #[serde(default = "default_task")]
    pub task: TaskKind,
    /// Directory holding training logs and checkpoints
    #[serde(default)]
    pub save_dir: PathBuf,
    /// Smallest graph size in the training range
    #[serde(default)]
    pub min_size: u32,
    /// Largest graph size in the training range
    #[serde(default)]
    pub max_size: u32,
    /// JSON corpus of graphs to evaluate
    #[serde(default)]
    pub data: PathBuf,
    /// Where report/result files go (defaults to save_dir)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Bounded wait per solve call in seconds; unset leaves solves unbounded
    #[serde(default)]
    pub solve_timeout_secs: Option<u64>,
    /// Evaluate at most this many graphs from the corpus
    #[serde(default)]
    pub max_graphs: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_task() -> TaskKind {
    TaskKind::Maxcut
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EvalConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory.
    ///
    /// Layering: built-in defaults, then `<dir>/default.toml` if present,
    /// then environment variables (`CUTBENCH_SAVE_DIR`,
    /// `CUTBENCH_LOGGING__LEVEL`, ...).
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                Environment::with_prefix("CUTBENCH")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.save_dir)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.save_dir.as_os_str().is_empty() {
            errors.push("save_dir must be set".to_string());
        }

        if self.data.as_os_str().is_empty() {
            errors.push("data must point at a graph corpus".to_string());
        }

        if self.min_size == 0 || self.max_size == 0 {
            errors.push("min_size and max_size must be positive".to_string());
        }

        if self.min_size > self.max_size {
            errors.push(format!(
                "min_size {} exceeds max_size {}",
                self.min_size, self.max_size
            ));
        }

        if self.solve_timeout_secs == Some(0) {
            errors.push("solve_timeout_secs must be positive when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
