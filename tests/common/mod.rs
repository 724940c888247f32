#![allow(dead_code)]

use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;
use twindiff::options::{FontProbe, Options};

/// Test environment fixture with a temporary directory for config and
/// input files.
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    /// Creates a fresh temporary environment.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Path of the options file inside the environment.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    /// Writes an input file and returns its path.
    pub fn file(&self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Font probe that reports every family as installed, making font
/// resolution deterministic in tests.
pub struct InstalledEverywhere;

impl FontProbe for InstalledEverywhere {
    fn is_family_installed(&self, _family: &str) -> bool {
        true
    }
}

/// Loads options from the environment with the deterministic probe.
pub fn load_options(env: &TestEnv) -> Result<Options> {
    Options::load_with_probe(&env.config_path(), &InstalledEverywhere)
}
