//! Validator configuration.
//!
//! Stored as TOML. Partial files are fine: anything left out keeps its
//! default, and every check is enabled unless switched off under `[checks]`.
//!
//! ```toml
//! grid_size = 20.0
//! floating_symbol_ids = ["load-7"]
//! model_element_ids = ["E1", "E2"]
//!
//! [checks]
//! collisions = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sld_core::{GridSize, SldResult};

/// Settings shared by every validation rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Grid spacing for the alignment check; keep in sync with the router.
    pub grid_size: GridSize,

    /// Symbols an external analysis already found floating.
    pub floating_symbol_ids: Vec<String>,

    /// Element ids of the domain model. `None` disables the hidden-element check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_element_ids: Option<Vec<String>>,

    /// Per-rule switches.
    pub checks: CheckToggles,
}

/// One flag per rule, all enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckToggles {
    /// V-01
    pub orphan_symbols: bool,
    /// V-01b
    pub duplicate_elements: bool,
    /// V-02
    pub hidden_elements: bool,
    /// V-03
    pub dangling_references: bool,
    /// V-04
    pub islands: bool,
    /// V-05
    pub missing_source: bool,
    /// V-06
    pub unswitched_branches: bool,
    /// V-07
    pub unprotected_transformers: bool,
    /// G-01
    pub collisions: bool,
    /// G-03
    pub grid_alignment: bool,
    /// G-04
    pub floating_symbols: bool,
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self::all()
    }
}

impl CheckToggles {
    pub fn all() -> Self {
        Self {
            orphan_symbols: true,
            duplicate_elements: true,
            hidden_elements: true,
            dangling_references: true,
            islands: true,
            missing_source: true,
            unswitched_branches: true,
            unprotected_transformers: true,
            collisions: true,
            grid_alignment: true,
            floating_symbols: true,
        }
    }

    /// Only the topology rules (V-*), for callers that do not care about layout.
    pub fn topology_only() -> Self {
        Self {
            collisions: false,
            grid_alignment: false,
            floating_symbols: false,
            ..Self::all()
        }
    }
}

impl ValidatorConfig {
    pub fn with_grid_size(mut self, grid_size: GridSize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_floating<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.floating_symbol_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_model_elements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model_element_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_checks(mut self, checks: CheckToggles) -> Self {
        self.checks = checks;
        self
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> SldResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> SldResult<Self> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> SldResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
