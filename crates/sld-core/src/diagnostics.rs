//! Validation issues and results.
//!
//! A [`ValidationIssue`] names the rule that produced it, a severity, a
//! human-readable message, the symbols it implicates and an optional
//! remediation hint. A [`ValidationResult`] wraps the ordered issue list with
//! per-severity counts and the save gate:
//!
//! - `valid` is true iff there are zero [`Severity::Error`] issues
//! - warnings and infos never block
//!
//! # Example
//!
//! ```
//! use sld_core::diagnostics::{ValidationIssue, ValidationResult};
//!
//! let result = ValidationResult::from_issues(vec![
//!     ValidationIssue::warning("G-01", "Symbols overlap").with_symbols(["b1", "b2"]),
//!     ValidationIssue::info("G-03", "Symbol off grid").with_symbol("b1"),
//! ]);
//!
//! assert!(result.valid);
//! assert_eq!(result.stats.warnings, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{SldError, SldResult};

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Blocks saving/committing the diagram
    Error,
    /// Suspicious but allowed
    Warning,
    /// Cosmetic suggestion
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A single finding produced by a validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Rule identifier, e.g. "V-03"
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Implicated symbol identifiers
    #[serde(default)]
    pub symbol_ids: Vec<String>,
    /// Optional remediation hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            symbol_ids: Vec::new(),
            hint: None,
        }
    }

    pub fn error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, rule_id, message)
    }

    pub fn warning(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, rule_id, message)
    }

    pub fn info(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, rule_id, message)
    }

    pub fn with_symbol(mut self, symbol_id: impl Into<String>) -> Self {
        self.symbol_ids.push(symbol_id.into());
        self
    }

    pub fn with_symbols<I, S>(mut self, symbol_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbol_ids.extend(symbol_ids.into_iter().map(Into::into));
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn implicates(&self, symbol_id: &str) -> bool {
        self.symbol_ids.iter().any(|id| id == symbol_id)
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}] {}",
            self.severity.as_str(),
            self.rule_id,
            self.message
        )?;
        if !self.symbol_ids.is_empty() {
            write!(f, " ({})", self.symbol_ids.join(", "))?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " hint: {}", hint)?;
        }
        Ok(())
    }
}

/// Aggregate counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub total: usize,
}

/// Outcome of a validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `issues` contains no errors
    pub valid: bool,
    /// Issues in rule execution order
    pub issues: Vec<ValidationIssue>,
    pub stats: ValidationStats,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let mut stats = ValidationStats {
            total: issues.len(),
            ..ValidationStats::default()
        };
        for issue in &issues {
            match issue.severity {
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
                Severity::Info => stats.infos += 1,
            }
        }
        Self {
            valid: stats.errors == 0,
            issues,
            stats,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn issues_by_rule<'a>(
        &'a self,
        rule_id: &'a str,
    ) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.rule_id == rule_id)
    }

    /// Save gate: `Err(SldError::Validation)` when any error is present.
    pub fn ensure_valid(&self) -> SldResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(SldError::Validation(self.summary()))
        }
    }

    pub fn summary(&self) -> String {
        let plural = |n: usize, word: &str| {
            format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
        };
        if self.stats.total == 0 {
            return "No issues".to_string();
        }
        let mut parts = Vec::new();
        if self.stats.errors > 0 {
            parts.push(plural(self.stats.errors, "error"));
        }
        if self.stats.warnings > 0 {
            parts.push(plural(self.stats.warnings, "warning"));
        }
        if self.stats.infos > 0 {
            parts.push(plural(self.stats.infos, "info"));
        }
        parts.join(", ")
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.valid { "valid" } else { "invalid" };
        writeln!(f, "Diagram {}: {}", verdict, self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}
