//! Configuration loader.
//!
//! Loads table geometry and simulation parameters from YAML files, allowing
//! different tables and feels without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! configs/
//! ├── tables/
//! │   └── standard.yaml
//! └── params/
//!     └── default.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{SimulationParams, Table};

/// Error type for configuration loading operations.
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::NotFound(name) => write!(f, "Config not found: {}", name),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

/// Config loader with a configurable base directory.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a new loader with the given base path.
    ///
    /// The base path should contain `tables/` and `params/` subdirectories.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a table by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ConfigLoader::new("configs");
    /// let table = loader.load_table("standard")?;
    /// ```
    pub fn load_table(&self, name: &str) -> Result<Table, ConfigError> {
        let path = self.base_path.join("tables").join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let table: Table = serde_yaml::from_str(&contents)?;
        Ok(table)
    }

    /// Load simulation parameters by name.
    pub fn load_params(&self, name: &str) -> Result<SimulationParams, ConfigError> {
        let path = self.base_path.join("params").join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let params: SimulationParams = serde_yaml::from_str(&contents)?;
        Ok(params)
    }

    /// List all available tables.
    pub fn list_tables(&self) -> Result<Vec<String>, ConfigError> {
        self.list_configs("tables")
    }

    /// List all available parameter sets.
    pub fn list_params(&self) -> Result<Vec<String>, ConfigError> {
        self.list_configs("params")
    }

    fn list_configs(&self, subdir: &str) -> Result<Vec<String>, ConfigError> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn get_configs_path() -> PathBuf {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(manifest_dir).join("..").join("configs")
    }

    #[test]
    fn test_load_standard_table() {
        let loader = ConfigLoader::new(get_configs_path());
        let result = loader.load_table("standard");

        assert!(result.is_ok(), "Should load standard: {:?}", result.err());
        assert_eq!(result.unwrap(), Table::standard());
    }

    #[test]
    fn test_load_default_params() {
        let loader = ConfigLoader::new(get_configs_path());
        let result = loader.load_params("default");

        assert!(result.is_ok(), "Should load default: {:?}", result.err());
        assert_eq!(result.unwrap(), SimulationParams::standard());
    }

    #[test]
    fn test_load_nonexistent_table() {
        let loader = ConfigLoader::new(get_configs_path());
        let result = loader.load_table("nonexistent_table_xyz");

        assert!(result.is_err());
        match result {
            Err(ConfigError::NotFound(name)) => {
                assert_eq!(name, "nonexistent_table_xyz");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_list_tables() {
        let loader = ConfigLoader::new(get_configs_path());
        let result = loader.list_tables();

        assert!(result.is_ok());
        assert!(result.unwrap().contains(&"standard".to_string()));
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let loader = ConfigLoader::new("/nonexistent/base/path");
        assert!(loader.list_params().unwrap().is_empty());
    }
}
