//! Materials and processes offered to the user.
//!
//! The backend serves this list from `/api/lca/supported-materials`. When it
//! cannot be reached, the built-in table from `assets/catalog.json` is used
//! instead so a request can still be composed.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../assets/catalog.json"))
        .expect("embedded catalog is valid JSON")
});

/// A list of selectable materials and processes.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    pub materials: Vec<String>,
    pub processes: Vec<String>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Catalog {
        BUILTIN.clone()
    }

    /// `<config dir>/lca-client/catalog.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lca-client").join("catalog.json"))
    }

    /// Reads a catalog override from a JSON file.
    pub fn load(path: &Path) -> Result<Catalog> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;

        if catalog.materials.is_empty() || catalog.processes.is_empty() {
            anyhow::bail!(
                "Catalog file {} must list at least one material and one process",
                path.display()
            );
        }
        Ok(catalog)
    }

    /// Picks the explicit file when given, then the per-user override when
    /// it exists, then the built-in table.
    pub fn resolve(explicit: Option<&Path>) -> Result<Catalog> {
        if let Some(path) = explicit {
            return Catalog::load(path);
        }

        match Catalog::default_path() {
            Some(path) if path.exists() => {
                debug!("Using catalog override at {}", path.display());
                Catalog::load(&path)
            }
            _ => Ok(Catalog::builtin()),
        }
    }

    pub fn contains_material(&self, name: &str) -> bool {
        self.materials.iter().any(|m| m.eq_ignore_ascii_case(name.trim()))
    }

    pub fn contains_process(&self, name: &str) -> bool {
        self.processes.iter().any(|p| p.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_size() {
        let catalog = Catalog::builtin();
        assert!(catalog.materials.len() >= 40);
        assert!(catalog.processes.len() >= 60);
        assert!(catalog.contains_material("copper ore"));
        assert!(catalog.contains_process("Smelting"));
    }

    #[test]
    fn test_load_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"materials": ["Scandium"], "processes": ["Solvent extraction"]}}"#
        )
        .unwrap();

        let catalog = Catalog::resolve(Some(file.path())).unwrap();
        assert_eq!(catalog.materials, vec!["Scandium"]);
        assert_eq!(catalog.processes, vec!["Solvent extraction"]);
    }

    #[test]
    fn test_load_rejects_empty_lists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"materials": [], "processes": ["Smelting"]}}"#).unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("at least one material"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
