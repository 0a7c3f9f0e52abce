//! Display truncation of node labels.
//!
//! Truncation is a presentation rule: it produces a display string and never
//! touches the stored label.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Labels longer than `max_chars` show the first `keep_chars` characters
/// followed by `ellipsis`. Lengths count Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRule {
    pub max_chars: usize,
    pub keep_chars: usize,
    pub ellipsis: String,
}

impl Default for LabelRule {
    fn default() -> Self {
        Self {
            max_chars: 20,
            keep_chars: 18,
            ellipsis: "...".to_string(),
        }
    }
}

impl LabelRule {
    pub fn display<'a>(&self, label: &'a str) -> Cow<'a, str> {
        if label.chars().count() <= self.max_chars {
            return Cow::Borrowed(label);
        }
        let cut = label
            .char_indices()
            .nth(self.keep_chars)
            .map(|(i, _)| i)
            .unwrap_or(label.len());
        Cow::Owned(format!("{}{}", &label[..cut], self.ellipsis))
    }

    pub fn is_truncated(&self, label: &str) -> bool {
        label.chars().count() > self.max_chars
    }
}

/// Apply the default rule (20 / 18 / `...`).
pub fn display_label(label: &str) -> Cow<'_, str> {
    LabelRule::default().display(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Gestão Horizontal", "Gestão Horizontal")]
    #[case("exactly twenty chars", "exactly twenty chars")]
    #[case("twenty-one characters", "twenty-one charact...")]
    #[case(
        "Governança Corporativa e Estrutura Organizacional",
        "Governança Corpora..."
    )]
    #[case("", "")]
    fn given_label_when_displaying_then_applies_rule(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(display_label(label), expected);
    }

    #[test]
    fn given_short_label_when_displaying_then_borrows() {
        assert!(matches!(display_label("Root"), Cow::Borrowed("Root")));
    }

    #[test]
    fn given_custom_rule_when_displaying_then_uses_its_marker() {
        let rule = LabelRule {
            max_chars: 5,
            keep_chars: 4,
            ellipsis: "…".to_string(),
        };
        assert_eq!(rule.display("Liderança"), "Lide…");
        assert!(rule.is_truncated("Liderança"));
        assert!(!rule.is_truncated("Lider"));
    }
}
