use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseConversion {
    #[default]
    Unchanged,
    LowerCase,
    UpperCase,
    SentenceCase,
    InitialCaps,
    ToggleCase,
}

impl CaseConversion {
    pub fn apply(self, string: &str) -> String {
        match self {
            Self::Unchanged => string.to_owned(),
            Self::LowerCase => string.to_lowercase(),
            Self::UpperCase => string.to_uppercase(),
            Self::SentenceCase => sentence_case(string),
            Self::InitialCaps => initial_caps(string),
            Self::ToggleCase => toggle_case(string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrimBlanks {
    None,
    Leading,
    Trailing,
    #[default]
    LeadingAndTrailing,
}

impl TrimBlanks {
    pub fn apply(self, string: &str) -> &str {
        match self {
            Self::None => string,
            Self::Leading => string.trim_start(),
            Self::Trailing => string.trim_end(),
            Self::LeadingAndTrailing => string.trim(),
        }
    }
}

/// First character of the whole string uppercased, everything after it
/// lowercased.
fn sentence_case(string: &str) -> String {
    let mut chars = string.chars();
    match chars.next() {
        Some(first) => {
            let mut result = String::with_capacity(string.len());
            result.extend(first.to_uppercase());
            result.push_str(&chars.as_str().to_lowercase());
            result
        }
        None => String::new(),
    }
}

/// First letter of every whitespace-delimited word uppercased, the rest
/// of the word lowercased.
fn initial_caps(string: &str) -> String {
    let mut result = String::with_capacity(string.len());
    let mut at_word_start = true;
    for ch in string.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            at_word_start = false;
            result.extend(ch.to_uppercase());
        } else {
            result.extend(ch.to_lowercase());
        }
    }
    result
}

fn toggle_case(string: &str) -> String {
    let mut result = String::with_capacity(string.len());
    for ch in string.chars() {
        if ch.is_uppercase() {
            result.extend(ch.to_lowercase());
        } else if ch.is_lowercase() {
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
    }
    result
}
