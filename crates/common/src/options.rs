//! Verification option types and default resolution.
//!
//! `VerificationOptions` is the override payload the configuration UI
//! saves for a session; `ResolvedOptions` is the fully-resolved form
//! the verifier is configured with. `resolve` merges the two.

use serde::{Deserialize, Serialize};

use crate::countries;

/// Upper bound on the excluded-country list kept per save.
pub const MAX_EXCLUDED_COUNTRIES: usize = 40;

/// Options saved by the configuration step. Every field is optional;
/// an absent field falls back to the system default at resolve time.
/// Unknown fields are rejected at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationOptions {
    /// Minimum age to enforce. An explicit 0 disables the age check.
    #[serde(rename = "minimumAge", skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<u32>,

    /// ISO-3166 alpha-3 codes. A non-empty list fully replaces the
    /// default exclusion list.
    #[serde(rename = "excludedCountries", skip_serializing_if = "Option::is_none")]
    pub excluded_countries: Option<Vec<String>>,

    /// Sanctions-list screening toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ofac: Option<bool>,

    // Disclosure flags, flat on the wire as the configuration UI sends them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_state: Option<bool>,
}

impl VerificationOptions {
    /// Uppercase and deduplicate the excluded-country codes, keeping
    /// at most [`MAX_EXCLUDED_COUNTRIES`] entries (first occurrence
    /// wins). Returns the number of entries dropped so the caller can
    /// log it; saving itself never fails.
    pub fn normalize(&mut self) -> usize {
        let Some(codes) = self.excluded_countries.as_mut() else {
            return 0;
        };

        let before = codes.len();
        let mut seen = std::collections::HashSet::new();
        codes.retain_mut(|code| {
            *code = code.trim().to_ascii_uppercase();
            !code.is_empty() && seen.insert(code.clone())
        });
        codes.truncate(MAX_EXCLUDED_COUNTRIES);

        before - codes.len()
    }
}

/// Disclosure flags for the personal-data fields a credential subject
/// may carry. `true` means the field is revealed in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosures {
    pub name: bool,
    pub nationality: bool,
    pub date_of_birth: bool,
    pub passport_number: bool,
    pub gender: bool,
    pub expiry_date: bool,
    pub issuing_state: bool,
}

impl Disclosures {
    /// Flags paired with their credential-subject field names.
    pub fn flags(&self) -> [(&'static str, bool); 7] {
        [
            ("name", self.name),
            ("nationality", self.nationality),
            ("date_of_birth", self.date_of_birth),
            ("passport_number", self.passport_number),
            ("gender", self.gender),
            ("expiry_date", self.expiry_date),
            ("issuing_state", self.issuing_state),
        ]
    }
}

/// Fully-resolved verification configuration applied to the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    /// 0 means the age check is disabled.
    pub minimum_age: u32,
    pub excluded_countries: Vec<String>,
    pub ofac: bool,
    pub disclosures: Disclosures,
}

impl Default for ResolvedOptions {
    /// System defaults applied when a session has no saved options.
    fn default() -> Self {
        Self {
            minimum_age: 18,
            excluded_countries: ["IRN", "IRQ", "PRK", "RUS", "SYR", "VEN"]
                .into_iter()
                .map(String::from)
                .collect(),
            ofac: true,
            disclosures: Disclosures {
                name: true,
                nationality: true,
                date_of_birth: true,
                passport_number: true,
                gender: false,
                expiry_date: false,
                issuing_state: false,
            },
        }
    }
}

impl ResolvedOptions {
    pub fn age_check_enabled(&self) -> bool {
        self.minimum_age > 0
    }

    /// Excluded countries translated to the full names the downstream
    /// verifier expects.
    pub fn excluded_country_names(&self) -> Vec<String> {
        self.excluded_countries
            .iter()
            .map(|code| countries::country_name(code))
            .collect()
    }
}

/// Merge saved overrides with the system defaults.
///
/// Field policy: a field explicitly present in `saved` wins, including
/// an explicit `false` over a `true` default; a non-empty saved
/// country list fully replaces the default list (no union); an absent
/// or empty list keeps the defaults.
pub fn resolve(saved: Option<&VerificationOptions>, defaults: &ResolvedOptions) -> ResolvedOptions {
    let Some(saved) = saved else {
        return defaults.clone();
    };

    let excluded_countries = match &saved.excluded_countries {
        Some(list) if !list.is_empty() => list.clone(),
        _ => defaults.excluded_countries.clone(),
    };

    let d = &defaults.disclosures;
    ResolvedOptions {
        minimum_age: saved.minimum_age.unwrap_or(defaults.minimum_age),
        excluded_countries,
        ofac: saved.ofac.unwrap_or(defaults.ofac),
        disclosures: Disclosures {
            name: saved.name.unwrap_or(d.name),
            nationality: saved.nationality.unwrap_or(d.nationality),
            date_of_birth: saved.date_of_birth.unwrap_or(d.date_of_birth),
            passport_number: saved.passport_number.unwrap_or(d.passport_number),
            gender: saved.gender.unwrap_or(d.gender),
            expiry_date: saved.expiry_date.unwrap_or(d.expiry_date),
            issuing_state: saved.issuing_state.unwrap_or(d.issuing_state),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absent_yields_defaults() {
        let defaults = ResolvedOptions::default();
        let resolved = resolve(None, &defaults);
        assert_eq!(resolved, defaults);
    }

    #[test]
    fn test_resolve_zero_age_disables_check() {
        let saved = VerificationOptions {
            minimum_age: Some(0),
            ..Default::default()
        };
        let resolved = resolve(Some(&saved), &ResolvedOptions::default());
        assert_eq!(resolved.minimum_age, 0);
        assert!(!resolved.age_check_enabled());
    }

    #[test]
    fn test_resolve_explicit_false_overrides_true_default() {
        let saved = VerificationOptions {
            ofac: Some(false),
            passport_number: Some(false),
            ..Default::default()
        };
        let resolved = resolve(Some(&saved), &ResolvedOptions::default());
        assert!(!resolved.ofac);
        assert!(!resolved.disclosures.passport_number);
        // Untouched flags keep their defaults
        assert!(resolved.disclosures.name);
    }

    #[test]
    fn test_resolve_countries_replace_not_union() {
        let saved = VerificationOptions {
            excluded_countries: Some(vec!["IRN".into(), "RUS".into()]),
            ..Default::default()
        };
        let resolved = resolve(Some(&saved), &ResolvedOptions::default());
        assert_eq!(resolved.excluded_countries, vec!["IRN", "RUS"]);
    }

    #[test]
    fn test_resolve_empty_country_list_keeps_defaults() {
        let saved = VerificationOptions {
            excluded_countries: Some(vec![]),
            ..Default::default()
        };
        let defaults = ResolvedOptions::default();
        let resolved = resolve(Some(&saved), &defaults);
        assert_eq!(resolved.excluded_countries, defaults.excluded_countries);
    }

    #[test]
    fn test_normalize_dedupes_and_uppercases() {
        let mut options = VerificationOptions {
            excluded_countries: Some(vec!["irn".into(), "IRN".into(), " rus ".into()]),
            ..Default::default()
        };
        let dropped = options.normalize();
        assert_eq!(dropped, 1);
        assert_eq!(
            options.excluded_countries,
            Some(vec!["IRN".to_string(), "RUS".to_string()])
        );
    }

    #[test]
    fn test_normalize_caps_list_length() {
        let codes: Vec<String> = (0..50).map(|i| format!("C{:02}", i)).collect();
        let mut options = VerificationOptions {
            excluded_countries: Some(codes),
            ..Default::default()
        };
        let dropped = options.normalize();
        assert_eq!(dropped, 10);
        assert_eq!(
            options.excluded_countries.as_ref().map(Vec::len),
            Some(MAX_EXCLUDED_COUNTRIES)
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{"minimumAge": 18, "shoe_size": 42}"#;
        let parsed: Result<VerificationOptions, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "minimumAge": 21,
            "excludedCountries": ["IRN", "RUS"],
            "ofac": true,
            "date_of_birth": false
        }"#;
        let parsed: VerificationOptions = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.minimum_age, Some(21));
        assert_eq!(
            parsed.excluded_countries,
            Some(vec!["IRN".to_string(), "RUS".to_string()])
        );
        assert_eq!(parsed.ofac, Some(true));
        assert_eq!(parsed.date_of_birth, Some(false));
        assert_eq!(parsed.name, None);
    }
}
