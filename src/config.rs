//! Table editor configuration persistence
//!
//! Stores user preferences in `~/.config/mdgrid/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Grid editor settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableEditorConfig {
    /// Animation frames focus restoration waits for the rebuilt table
    pub focus_retry_frames: u32,
    /// Width of one character cell in logical pixels
    pub char_width: f32,
    pub line_height: f32,
    /// Row/column handle thickness in logical pixels
    pub handle_size: f32,
    /// Column width bounds, in characters
    pub min_column_chars: usize,
    pub max_column_chars: usize,
}

impl Default for TableEditorConfig {
    fn default() -> Self {
        Self {
            focus_retry_frames: 5,
            char_width: 8.0,
            line_height: 20.0,
            handle_size: 12.0,
            min_column_chars: 3,
            max_column_chars: 40,
        }
    }
}

impl TableEditorConfig {
    /// Load config from the user config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; missing or invalid files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the user config directory
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace values that cannot be laid out with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.char_width > 0.0) {
            self.char_width = defaults.char_width;
        }
        if !(self.line_height > 0.0) {
            self.line_height = defaults.line_height;
        }
        if !(self.handle_size >= 0.0) {
            self.handle_size = defaults.handle_size;
        }
        self.min_column_chars = self.min_column_chars.max(1);
        self.max_column_chars = self.max_column_chars.max(self.min_column_chars);
        self
    }
}
