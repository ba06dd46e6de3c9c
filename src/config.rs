use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::display::DEFAULT_ZOOM;
use crate::words::DEFAULT_SAMPLE_SIZE;

/// Settings that survive between runs. Loaded before the terminal is
/// taken over and written back on a clean quit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub number_of_words: usize,
    pub dictionary: String,
    pub zoom: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_words: DEFAULT_SAMPLE_SIZE,
            dictionary: "standard".to_string(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = ProjectDirs::from("", "", "typethis")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typethis_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> Option<Config> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// An unreadable or unparsable file degrades to the defaults; the
    /// next save rewrites it.
    fn load(&self) -> Config {
        self.read().unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(cfg).map_err(io::Error::from)?;
        fs::write(&self.path, json)
    }
}
