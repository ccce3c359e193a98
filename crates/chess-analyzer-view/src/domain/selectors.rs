//! Ordered selector strategies for locating page controls.
//!
//! The hosted page is not ours, so its markup may differ between versions.
//! Instead of one hard-coded lookup, each control is found by trying a list
//! of named CSS selectors in order; the first that matches wins.
//!
//! | Chain            | Order                                                              |
//! |------------------|--------------------------------------------------------------------|
//! | record input     | `#pgn`, `textarea[name="pgn"]`, `textarea`                         |
//! | analyse trigger  | `#review-button`, `button[type="submit"]`, `input[type="submit"]`, `button.analyze`, `button` |

use serde::{Deserialize, Serialize};

/// One named way of finding a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorStrategy {
    /// Label used in logs and run reports.
    pub name: String,
    /// CSS selector passed to `document.querySelector`.
    pub css: String,
}

impl SelectorStrategy {
    pub fn new(name: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            css: css.into(),
        }
    }
}

/// A priority-ordered list of strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorChain(Vec<SelectorStrategy>);

impl SelectorChain {
    /// Strategies for the game-record text input.
    pub fn record_input() -> Self {
        Self(vec![
            SelectorStrategy::new("pgn-id", "#pgn"),
            SelectorStrategy::new("pgn-field", r#"textarea[name="pgn"]"#),
            SelectorStrategy::new("first-textarea", "textarea"),
        ])
    }

    /// Strategies for the control that starts analysis.
    pub fn analyze_trigger() -> Self {
        Self(vec![
            SelectorStrategy::new("review-button", "#review-button"),
            SelectorStrategy::new("submit-button", r#"button[type="submit"]"#),
            SelectorStrategy::new("submit-input", r#"input[type="submit"]"#),
            SelectorStrategy::new("analyze-button", "button.analyze"),
            SelectorStrategy::new("first-button", "button"),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectorStrategy> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_input_tries_id_before_generic_textarea() {
        let css: Vec<_> = SelectorChain::record_input()
            .iter()
            .map(|s| s.css.clone())
            .collect();
        assert_eq!(css, ["#pgn", r#"textarea[name="pgn"]"#, "textarea"]);
    }

    #[test]
    fn test_analyze_trigger_falls_back_to_any_button_last() {
        let chain = SelectorChain::analyze_trigger();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.iter().next().unwrap().css, "#review-button");
        assert_eq!(chain.iter().last().unwrap().css, "button");
    }

    #[test]
    fn test_strategy_names_are_unique() {
        for chain in [SelectorChain::record_input(), SelectorChain::analyze_trigger()] {
            let mut names: Vec<_> = chain.iter().map(|s| s.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), chain.len());
        }
    }

    #[test]
    fn test_chain_deserializes_from_plain_list() {
        // Arrange: shape used in the host's TOML config (via serde_json here).
        let json = r##"[{"name":"custom","css":"#game-input"}]"##;

        // Act
        let chain: SelectorChain = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.iter().next().unwrap().css, "#game-input");
    }
}
