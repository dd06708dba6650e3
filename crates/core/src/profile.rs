use crate::convert::{CaseConversion, TrimBlanks};
use crate::counter::CounterState;
use crate::replace::ReplacePattern;
use crate::DEFAULT_TEMPLATE;
use serde::{Deserialize, Serialize};

/// Persisted bundle of template, counter seed, regex rules and
/// case/trim settings. The engine only reads it; editing happens in
/// the caller, which must call `Batch::invalidate_preview` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub template: String,
    pub counter_start: i64,
    pub counter_step: i64,
    /// 0 means auto width.
    pub counter_width: usize,
    pub patterns: Vec<ReplacePattern>,
    pub case_conversion: CaseConversion,
    pub trim_blanks: TrimBlanks,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            template: DEFAULT_TEMPLATE.to_string(),
            counter_start: 1,
            counter_step: 1,
            counter_width: 0,
            patterns: Vec::new(),
            case_conversion: CaseConversion::Unchanged,
            trim_blanks: TrimBlanks::LeadingAndTrailing,
        }
    }
}

impl Profile {
    pub fn counter(&self) -> CounterState {
        CounterState::new(self.counter_start, self.counter_step, self.counter_width)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_documented_seed() {
        let profile = Profile::default();
        assert_eq!(profile.template, "$N");
        assert_eq!(profile.counter_start, 1);
        assert_eq!(profile.counter_step, 1);
        assert_eq!(profile.counter_width, 0);
        assert!(profile.patterns.is_empty());
        assert_eq!(profile.case_conversion, CaseConversion::Unchanged);
        assert_eq!(profile.trim_blanks, TrimBlanks::LeadingAndTrailing);
    }

    #[test]
    fn profile_survives_toml_round_trip() {
        let mut profile = Profile::default();
        profile.name = "Audio Files".to_string();
        profile.template = "$T(Audio.AlbumArtist) - $T(Audio.Title).$e".to_string();
        profile.patterns.push(ReplacePattern {
            pattern: "[ _]+".to_string(),
            replacement: " ".to_string(),
            match_case: false,
        });
        profile.case_conversion = CaseConversion::InitialCaps;

        let body = toml::to_string_pretty(&profile).expect("serialize");
        let loaded: Profile = toml::from_str(&body).expect("deserialize");
        assert_eq!(loaded, profile);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let loaded: Profile = toml::from_str("template = \"$n.$e\"").expect("deserialize");
        assert_eq!(loaded.template, "$n.$e");
        assert_eq!(loaded.counter_start, 1);
        assert_eq!(loaded.trim_blanks, TrimBlanks::LeadingAndTrailing);
    }
}
