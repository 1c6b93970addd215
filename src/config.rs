use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::book_gen::assembler::{
    BookOptions, CHAPTER_COUNT, DEFAULT_AUDIENCE, DEFAULT_TONE, DEFAULT_TOPIC,
    DEFAULT_WORDS_PER_CHAPTER,
};
use crate::core::book_gen::cache::DEFAULT_CACHE_CAPACITY;
use crate::core::export::{ExportResult, PageSpec, DEFAULT_BACKGROUND, DEFAULT_PIXEL_RATIO};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub cache: CacheConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Defaults for the generate action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub topic: String,
    pub audience: String,
    pub tone: String,
    /// Clamped at assembly time, so out-of-range values are tolerated here.
    pub words_per_chapter: u32,
}

/// Long-form text cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of chapter texts kept in memory.
    pub capacity: usize,
}

/// Document export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
    /// Page background as `#rrggbb`.
    pub background: String,
    pub pixel_ratio: u32,
}

/// Logging setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Write JSON logs to a daily rolling file.
    pub file_logging: bool,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
    /// Gzip rolled-over log files on startup.
    pub compress_old_logs: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            tone: DEFAULT_TONE.to_string(),
            words_per_chapter: DEFAULT_WORDS_PER_CHAPTER,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            background: DEFAULT_BACKGROUND.to_string(),
            pixel_ratio: DEFAULT_PIXEL_RATIO,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            log_dir: None,
            compress_old_logs: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/booksmith/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!("No config file at {}; using defaults", config_path.display());
                Self::default()
            }
        }
    }

    /// Options for a generate action, overriding the configured defaults with
    /// any command-line values.
    pub fn book_options(
        &self,
        topic: Option<&str>,
        audience: Option<&str>,
        tone: Option<&str>,
    ) -> BookOptions {
        let generation = &self.generation;
        BookOptions {
            topic: topic.unwrap_or(&generation.topic).to_string(),
            audience: audience.unwrap_or(&generation.audience).to_string(),
            tone: tone.unwrap_or(&generation.tone).to_string(),
            num_chapters: CHAPTER_COUNT,
            min_words_per_chapter: generation.words_per_chapter,
        }
    }

    /// Page geometry for export; fails on a malformed background color.
    pub fn page_spec(&self) -> ExportResult<PageSpec> {
        PageSpec::a4_dark()
            .with_pixel_ratio(self.export.pixel_ratio)
            .with_background_hex(&self.export.background)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolved log directory (override or XDG data default).
    pub fn log_dir(&self) -> PathBuf {
        self.logging.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("booksmith").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("booksmith").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
