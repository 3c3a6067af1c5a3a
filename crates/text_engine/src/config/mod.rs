//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Number of vertices emitted per glyph quad (two triangles, no index buffer)
pub const VERTICES_PER_GLYPH: usize = 6;

/// Maximum number of distinct (font map, depth) batches per frame
pub const MAX_BATCHES: usize = 128;

/// Heuristic average string length used to size the text entry table
pub const CHARACTERS_PER_ENTRY: usize = 8;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        Self::parse(path, &contents)
    }

    /// Parse configuration text, picking the format from the path extension
    fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Text Context Configuration
///
/// Every per-frame container of the text context is sized from the single
/// `max_characters` value; none of them grow afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Maximum number of characters that can be drawn per frame
    pub max_characters: usize,
}

impl TextConfig {
    /// Create a configuration for the given per-frame character budget
    pub const fn new(max_characters: usize) -> Self {
        Self { max_characters }
    }

    /// Set the per-frame character budget
    #[must_use]
    pub const fn with_max_characters(mut self, max_characters: usize) -> Self {
        self.max_characters = max_characters;
        self
    }

    /// Capacity of the vertex staging buffer, in vertices
    pub const fn max_vertex_count(&self) -> usize {
        self.max_characters * VERTICES_PER_GLYPH
    }

    /// Capacity of the shared text buffer, in bytes (terminators included)
    pub const fn text_buffer_capacity(&self) -> usize {
        self.max_characters
    }

    /// Capacity of the text entry table
    pub const fn max_text_entries(&self) -> usize {
        self.max_characters / CHARACTERS_PER_ENTRY
    }

    /// Capacity of the batch table and the render object pool
    pub const fn max_batches(&self) -> usize {
        MAX_BATCHES
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self::new(8192)
    }
}

impl Config for TextConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacities_derive_from_max_characters() {
        let config = TextConfig::new(1024);
        assert_eq!(config.max_vertex_count(), 6144);
        assert_eq!(config.text_buffer_capacity(), 1024);
        assert_eq!(config.max_text_entries(), 128);
        assert_eq!(config.max_batches(), 128);
    }

    #[test]
    fn test_parse_toml() {
        let config = TextConfig::parse("text.toml", "max_characters = 256").unwrap();
        assert_eq!(config, TextConfig::new(256));
    }

    #[test]
    fn test_parse_ron() {
        let config = TextConfig::parse("text.ron", "(max_characters: 64)").unwrap();
        assert_eq!(config.max_characters, 64);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = TextConfig::parse("text.toml", "").unwrap();
        assert_eq!(config, TextConfig::default());
    }

    #[test]
    fn test_unsupported_format() {
        let result = TextConfig::parse("text.json", "{}");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join("text_engine_config_test.toml");
        let path = path.to_string_lossy().to_string();

        let config = TextConfig::default().with_max_characters(2048);
        config.save_to_file(&path).unwrap();
        let loaded = TextConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
