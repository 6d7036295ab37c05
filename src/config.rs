//! Settings loaded from a TOML file
//!
//! ```toml
//! [reader]
//! buffer_capacity = 1048576
//! max_pages = 1024
//!
//! [decode]
//! region_policy = "clip"
//! max_output_pixels = 67108864
//! max_chunk_bytes = 536870912
//!
//! [logging]
//! level = "info"
//! file = "tiffregion.log"
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use log::LevelFilter;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::channel::RegionChannel;
use crate::decoder::{DecoderSettings, RegionPolicy, TiffRegionDecoder};
use crate::fetcher::{FileResolver, RegionFetcher, DEFAULT_BUFFER_CAPACITY};
use crate::tiff::errors::TiffError;

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(io::Error),
    /// The file is not valid TOML
    Parse(String),
    /// A key has a value of the wrong type or range
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read configuration: {}", e),
            ConfigError::Parse(msg) => write!(f, "Invalid configuration file: {}", msg),
            ConfigError::InvalidValue { key, message } => write!(f, "Invalid value for '{}': {}", key, message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<ConfigError> for TiffError {
    fn from(error: ConfigError) -> Self {
        TiffError::GenericError(error.to_string())
    }
}

/// How resources are opened and parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSettings {
    pub buffer_capacity: usize,
    pub max_pages: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        ReaderSettings {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_pages: DecoderSettings::default().max_pages,
        }
    }
}

/// Where and how much to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

/// All settings of the crate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub reader: ReaderSettings,
    pub decode: DecoderSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    fn apply(&mut self, root: &toml::Value) -> Result<(), ConfigError> {
        if let Some(reader) = root.get("reader") {
            if let Some(capacity) = positive_int(reader, "reader.buffer_capacity", "buffer_capacity")? {
                self.reader.buffer_capacity = capacity as usize;
            }
            if let Some(max_pages) = positive_int(reader, "reader.max_pages", "max_pages")? {
                self.reader.max_pages = max_pages as usize;
            }
        }

        if let Some(decode) = root.get("decode") {
            if let Some(policy) = string(decode, "decode.region_policy", "region_policy")? {
                self.decode.region_policy = RegionPolicy::from_str(policy)
                    .map_err(|message| invalid("decode.region_policy", message))?;
            }
            if let Some(max_pixels) = positive_int(decode, "decode.max_output_pixels", "max_output_pixels")? {
                self.decode.max_output_pixels = max_pixels as u64;
            }
            if let Some(max_bytes) = positive_int(decode, "decode.max_chunk_bytes", "max_chunk_bytes")? {
                self.decode.max_chunk_bytes = max_bytes as u64;
            }
        }

        if let Some(logging) = root.get("logging") {
            if let Some(level) = string(logging, "logging.level", "level")? {
                self.logging.level = LevelFilter::from_str(level)
                    .map_err(|_| invalid("logging.level", format!("unknown level '{}'", level)))?;
            }
            if let Some(file) = string(logging, "logging.file", "file")? {
                self.logging.file = Some(file.to_string());
            }
        }

        self.decode.max_pages = self.reader.max_pages;
        Ok(())
    }

    pub fn decoder(&self) -> TiffRegionDecoder {
        TiffRegionDecoder::new(self.decode)
    }

    pub fn fetcher(&self) -> RegionFetcher {
        RegionFetcher::new(
            Box::new(FileResolver::with_capacity(self.reader.buffer_capacity)),
            Box::new(self.decoder()),
        )
    }

    pub fn channel(&self) -> RegionChannel {
        RegionChannel::new(self.fetcher())
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let root: toml::Value = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut settings = Settings::default();
        settings.apply(&root)?;
        Ok(settings)
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn positive_int(table: &toml::Value, key: &str, name: &str) -> Result<Option<i64>, ConfigError> {
    match table.get(name) {
        None => Ok(None),
        Some(value) => match value.as_integer() {
            Some(n) if n > 0 => Ok(Some(n)),
            Some(n) => Err(invalid(key, format!("must be positive, got {}", n))),
            None => Err(invalid(key, format!("expected an integer, got {}", value))),
        },
    }
}

fn string<'v>(table: &'v toml::Value, key: &str, name: &str) -> Result<Option<&'v str>, ConfigError> {
    match table.get(name) {
        None => Ok(None),
        Some(value) => value.as_str()
            .map(Some)
            .ok_or_else(|| invalid(key, format!("expected a string, got {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings: Settings = "".parse().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.reader.buffer_capacity, 1_048_576);
        assert_eq!(settings.decode.region_policy, RegionPolicy::Clip);
        assert_eq!(settings.decode.max_output_pixels, 67_108_864);
    }

    #[test]
    fn reads_all_sections() {
        let settings: Settings = r#"
            [reader]
            buffer_capacity = 4096
            max_pages = 8

            [decode]
            region_policy = "reject"
            max_output_pixels = 1000
            max_chunk_bytes = 65536

            [logging]
            level = "debug"
            file = "out.log"
        "#.parse().unwrap();

        assert_eq!(settings.reader.buffer_capacity, 4096);
        assert_eq!(settings.reader.max_pages, 8);
        assert_eq!(settings.decode.max_pages, 8);
        assert_eq!(settings.decode.region_policy, RegionPolicy::Reject);
        assert_eq!(settings.decode.max_output_pixels, 1000);
        assert_eq!(settings.decode.max_chunk_bytes, 65536);
        assert_eq!(settings.logging.level, LevelFilter::Debug);
        assert_eq!(settings.logging.file.as_deref(), Some("out.log"));
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = "[decode]\nregion_policy = \"stretch\"".parse::<Settings>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "decode.region_policy"));

        let err = "[reader]\nmax_pages = 0".parse::<Settings>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = "[reader]\nbuffer_capacity = \"big\"".parse::<Settings>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        assert!(matches!("[reader".parse::<Settings>(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiffregion.toml");
        fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(Settings::load(&path).unwrap().logging.level, LevelFilter::Warn);
        assert!(matches!(Settings::load(&dir.path().join("none.toml")), Err(ConfigError::Io(_))));
    }
}
