use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// How a node name is reduced to its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum LabelRule {
    /// `and12` -> `and`, `x3` -> `x`
    TrailingDigits,
    /// `nand_G10` -> `nand`
    UnderscorePrefix,
}

impl LabelRule {
    fn pattern(&self) -> &'static Regex {
        static TRAILING_DIGITS: OnceLock<Regex> = OnceLock::new();
        static UNDERSCORE_PREFIX: OnceLock<Regex> = OnceLock::new();

        match self {
            LabelRule::TrailingDigits => TRAILING_DIGITS
                .get_or_init(|| Regex::new(r"^(.+?)\d+$").expect("label pattern is valid")),
            LabelRule::UnderscorePrefix => UNDERSCORE_PREFIX
                .get_or_init(|| Regex::new(r"^(.+?)_(.*)$").expect("label pattern is valid")),
        }
    }

    /// Names the rule does not match are their own label.
    pub fn node_label<'a>(&self, name: &'a str) -> &'a str {
        self.pattern()
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map_or(name, |m| m.as_str())
    }

    pub fn edge_label<'a>(&self, source: &'a str, target: &'a str) -> (&'a str, &'a str) {
        (self.node_label(source), self.node_label(target))
    }
}

impl std::fmt::Display for LabelRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelRule::TrailingDigits => write!(f, "trailing-digits"),
            LabelRule::UnderscorePrefix => write!(f, "underscore-prefix"),
        }
    }
}
