//! Bus voltage tier classification.
//!
//! An explicit nominal voltage wins when it falls in a known band. Otherwise
//! the bus name is searched for tier tokens, high tier first. Anything still
//! undecided counts as medium voltage.

use serde::{Deserialize, Serialize};
use sld_core::{Symbol, SymbolKind};

/// Voltage tier of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VoltageLevel {
    /// Low voltage (nN)
    #[serde(rename = "nN")]
    Low,
    /// Medium voltage (SN)
    #[serde(rename = "SN")]
    Medium,
    /// High voltage (WN)
    #[serde(rename = "WN")]
    High,
}

const HIGH_TOKENS: &[&str] = &["110", "WN"];
const MEDIUM_TOKENS: &[&str] = &["15", "20", "SN"];
const LOW_TOKENS: &[&str] = &["0.4", "0,4", "nN"];

impl VoltageLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            VoltageLevel::Low => "nN",
            VoltageLevel::Medium => "SN",
            VoltageLevel::High => "WN",
        }
    }

    fn tier(self) -> u8 {
        match self {
            VoltageLevel::Low => 0,
            VoltageLevel::Medium => 1,
            VoltageLevel::High => 2,
        }
    }

    /// True for WN/SN and SN/nN pairs.
    pub fn is_adjacent(self, other: VoltageLevel) -> bool {
        self.tier().abs_diff(other.tier()) == 1
    }

    /// Band for an explicit voltage in kV, if it falls in one.
    pub fn from_kv(kv: f64) -> Option<Self> {
        if kv >= 110.0 {
            Some(VoltageLevel::High)
        } else if kv >= 6.0 {
            Some(VoltageLevel::Medium)
        } else if kv > 0.0 && kv < 1.0 {
            Some(VoltageLevel::Low)
        } else {
            None
        }
    }

    /// Tier named in `name`, matched case-sensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let has = |tokens: &[&str]| tokens.iter().any(|token| name.contains(token));
        if has(HIGH_TOKENS) {
            Some(VoltageLevel::High)
        } else if has(MEDIUM_TOKENS) {
            Some(VoltageLevel::Medium)
        } else if has(LOW_TOKENS) {
            Some(VoltageLevel::Low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for VoltageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a bus symbol; non-bus symbols have no tier.
pub fn classify(symbol: &Symbol) -> Option<VoltageLevel> {
    let SymbolKind::Bus(bus) = &symbol.kind else {
        return None;
    };
    let level = bus
        .voltage_kv
        .and_then(|kv| VoltageLevel::from_kv(kv.value()))
        .or_else(|| VoltageLevel::from_name(&symbol.name))
        .unwrap_or(VoltageLevel::Medium);
    Some(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_core::{BusData, Kilovolts};

    fn bus(name: &str, kv: Option<f64>) -> Symbol {
        Symbol::new(
            "b",
            SymbolKind::Bus(BusData {
                width: 100.0,
                height: 10.0,
                voltage_kv: kv.map(Kilovolts),
            }),
        )
        .named(name)
    }

    #[test]
    fn test_explicit_voltage_bands() {
        assert_eq!(classify(&bus("", Some(110.0))), Some(VoltageLevel::High));
        assert_eq!(classify(&bus("", Some(15.0))), Some(VoltageLevel::Medium));
        assert_eq!(classify(&bus("", Some(6.0))), Some(VoltageLevel::Medium));
        assert_eq!(classify(&bus("", Some(0.4))), Some(VoltageLevel::Low));
    }

    #[test]
    fn test_explicit_voltage_beats_name() {
        assert_eq!(classify(&bus("RS 110", Some(0.4))), Some(VoltageLevel::Low));
    }

    #[test]
    fn test_out_of_band_voltage_falls_back_to_name() {
        // 3 kV is in no band
        assert_eq!(classify(&bus("Szyna nN", Some(3.0))), Some(VoltageLevel::Low));
        assert_eq!(classify(&bus("", Some(0.0))), Some(VoltageLevel::Medium));
    }

    #[test]
    fn test_name_tokens_in_priority_order() {
        assert_eq!(classify(&bus("GPZ 110/15", None)), Some(VoltageLevel::High));
        assert_eq!(classify(&bus("Rozdzielnia 20 kV", None)), Some(VoltageLevel::Medium));
        assert_eq!(classify(&bus("SN-1", None)), Some(VoltageLevel::Medium));
        assert_eq!(classify(&bus("Szyna 0,4", None)), Some(VoltageLevel::Low));
        assert_eq!(classify(&bus("bus nN", None)), Some(VoltageLevel::Low));
    }

    #[test]
    fn test_matching_is_case_sensitive_and_defaults_to_medium() {
        assert_eq!(classify(&bus("bus nn", None)), Some(VoltageLevel::Medium));
        assert_eq!(classify(&bus("wn feeder", None)), Some(VoltageLevel::Medium));
        assert_eq!(classify(&bus("", None)), Some(VoltageLevel::Medium));
    }

    #[test]
    fn test_non_bus_has_no_level() {
        let load = Symbol::new("ld", SymbolKind::load("B1")).named("110");
        assert_eq!(classify(&load), None);
    }

    #[test]
    fn test_adjacency() {
        assert!(VoltageLevel::High.is_adjacent(VoltageLevel::Medium));
        assert!(VoltageLevel::Low.is_adjacent(VoltageLevel::Medium));
        assert!(!VoltageLevel::High.is_adjacent(VoltageLevel::Low));
        assert!(!VoltageLevel::Medium.is_adjacent(VoltageLevel::Medium));
    }
}
