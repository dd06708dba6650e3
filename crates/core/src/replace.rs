use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// One find/replace rule as authored and persisted in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacePattern {
    pub pattern: String,
    pub replacement: String,
    pub match_case: bool,
}

/// A compiled rule. `well_formed` is an authoring-time signal for the
/// caller; apply-time processing silently skips rules that failed to
/// compile.
#[derive(Debug)]
pub struct RegexReplace {
    pub replacement: String,
    pub well_formed: bool,
    regex: Option<Regex>,
}

impl RegexReplace {
    pub fn compile(pattern: &ReplacePattern) -> Self {
        let regex = if pattern.pattern.is_empty() {
            None
        } else {
            RegexBuilder::new(&pattern.pattern)
                .case_insensitive(!pattern.match_case)
                .build()
                .ok()
        };
        Self {
            replacement: pattern.replacement.clone(),
            well_formed: regex.is_some(),
            regex,
        }
    }
}

pub fn compile_replace_chain(patterns: &[ReplacePattern]) -> Vec<RegexReplace> {
    patterns.iter().map(RegexReplace::compile).collect()
}

/// Applies the rules strictly in list order; the output of each rule is
/// the input of the next. Replacement text is literal, no
/// back-references.
pub fn apply_replace_chain(rules: &[RegexReplace], input: String) -> String {
    let mut value = input;
    for rule in rules {
        if let Some(regex) = &rule.regex {
            value = regex
                .replace_all(&value, NoExpand(&rule.replacement))
                .into_owned();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str, match_case: bool) -> ReplacePattern {
        ReplacePattern {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            match_case,
        }
    }

    #[test]
    fn rules_apply_in_order() {
        let chain = compile_replace_chain(&[rule("_", " ", false), rule("  +", " ", false)]);
        assert_eq!(
            apply_replace_chain(&chain, "a__b_c".to_string()),
            "a b c".to_string()
        );
    }

    #[test]
    fn match_case_controls_pattern_only() {
        let insensitive = compile_replace_chain(&[rule("img", "photo", false)]);
        assert_eq!(
            apply_replace_chain(&insensitive, "IMG_001".to_string()),
            "photo_001"
        );

        let sensitive = compile_replace_chain(&[rule("img", "photo", true)]);
        assert_eq!(
            apply_replace_chain(&sensitive, "IMG_001".to_string()),
            "IMG_001"
        );
    }

    #[test]
    fn replacement_text_is_literal() {
        let chain = compile_replace_chain(&[rule("(a)(b)", "$2$1", true)]);
        assert_eq!(apply_replace_chain(&chain, "ab".to_string()), "$2$1");
    }

    #[test]
    fn malformed_rule_is_flagged_and_skipped() {
        let chain = compile_replace_chain(&[
            rule("_", " ", false),
            rule("[broken", "x", false),
            rule("", "x", false),
            rule("c", "k", false),
        ]);
        assert!(chain[0].well_formed);
        assert!(!chain[1].well_formed);
        assert!(!chain[2].well_formed);

        let with_bad = apply_replace_chain(&chain, "a_b_c".to_string());
        let without_bad =
            apply_replace_chain(&compile_replace_chain(&[rule("_", " ", false), rule("c", "k", false)]), "a_b_c".to_string());
        assert_eq!(with_bad, without_bad);
        assert_eq!(with_bad, "a b k");
    }

    #[test]
    fn empty_chain_is_identity() {
        assert_eq!(apply_replace_chain(&[], " raw ".to_string()), " raw ");
    }
}
