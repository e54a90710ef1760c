//! Persistence of the selected tint color.
//!
//! The only persisted user preference is the selected color index. Platforms
//! implement [`PreferenceStore`] over their key-value store; [`MemoryPreferences`]
//! and (with `std`) the file-backed [`TomlPreferences`] are provided.

/// Errors raised while persisting preferences.
#[derive(Debug)]
pub enum PreferenceError {
    /// Reading or writing the backing store failed.
    #[cfg(feature = "std")]
    Io(std::io::Error),

    /// Stored data could not be encoded or decoded.
    Format,
}

impl core::fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            PreferenceError::Io(err) => write!(f, "preference store I/O failed: {}", err),
            PreferenceError::Format => write!(f, "preference data is malformed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PreferenceError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for PreferenceError {
    fn from(err: std::io::Error) -> Self {
        PreferenceError::Io(err)
    }
}

/// Key-value preference storage.
pub trait PreferenceStore {
    /// Returns the stored color index, if one was saved.
    fn load_color_index(&self) -> Option<usize>;

    /// Persists the selected color index.
    fn save_color_index(&mut self, index: usize) -> Result<(), PreferenceError>;
}

/// Volatile store, lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    color_index: Option<usize>,
}

impl MemoryPreferences {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load_color_index(&self) -> Option<usize> {
        self.color_index
    }

    fn save_color_index(&mut self, index: usize) -> Result<(), PreferenceError> {
        self.color_index = Some(index);
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use file_store::TomlPreferences;

#[cfg(feature = "std")]
mod file_store {
    use super::{PreferenceError, PreferenceStore};
    use serde::{Deserialize, Serialize};
    use std::path::PathBuf;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Stored {
        selected_color_index: Option<usize>,
    }

    /// Preferences persisted as a small TOML file.
    #[derive(Debug, Clone)]
    pub struct TomlPreferences {
        path: PathBuf,
    }

    impl TomlPreferences {
        /// Uses `path` as the backing file. The file is created on first save.
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Returns the backing file path.
        pub fn path(&self) -> &std::path::Path {
            &self.path
        }

        fn read(&self) -> Result<Stored, PreferenceError> {
            let contents = std::fs::read_to_string(&self.path)?;
            toml::from_str(&contents).map_err(|_| PreferenceError::Format)
        }
    }

    impl PreferenceStore for TomlPreferences {
        fn load_color_index(&self) -> Option<usize> {
            match self.read() {
                Ok(stored) => stored.selected_color_index,
                Err(PreferenceError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                    None
                }
                Err(e) => {
                    log::warn!("Ignoring preferences at {}: {e}", self.path.display());
                    None
                }
            }
        }

        fn save_color_index(&mut self, index: usize) -> Result<(), PreferenceError> {
            let stored = Stored {
                selected_color_index: Some(index),
            };
            let contents = toml::to_string(&stored).map_err(|_| PreferenceError::Format)?;
            std::fs::write(&self.path, contents)?;
            Ok(())
        }
    }
}
