//! Alarm sound sources.

use std::path::{Path, PathBuf};

use super::tone::ToneSpec;

/// Represents the source of the alarm sound.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// An audio file on disk (any format rodio can decode).
    File {
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// The built-in synthesized beep.
    Tone(ToneSpec),
}

impl SoundSource {
    /// Creates a file sound source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates the built-in tone source.
    #[must_use]
    pub fn tone() -> Self {
        Self::Tone(ToneSpec::default())
    }

    /// Picks the configured file, or the built-in tone when none is set.
    #[must_use]
    pub fn from_config(sound_file: Option<&Path>) -> Self {
        match sound_file {
            Some(path) => Self::file(path),
            None => Self::tone(),
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            Self::Tone(_) => "tone".to_string(),
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::tone()
    }
}
