//! Region-specific fallback policy for the label parser.
//!
//! A handful of the original deployment's heuristics are tied to one region:
//! repairing phone numbers that lost a digit of their area code, and guessing
//! the pharmacy chain from a nearby city name. Those guesses are wrong
//! anywhere else, so they are carried as explicit, overridable policy rather
//! than baked into the extractors.

/// Overridable regional fallbacks used by the pharmacy and phone extractors.
#[derive(Debug, Clone)]
pub struct RegionPolicy {
    /// Area code assumed for a bare 7-digit local number, e.g. "979".
    /// `None` disables the reconstruction and the number is not reported.
    pub default_area_code: Option<String>,

    /// Digit prepended when OCR kept only two digits of an area code,
    /// e.g. '8' turns "(32)" into "(832)". `None` disables the repair.
    pub area_code_repair_digit: Option<char>,

    /// City keyword → pharmacy chain, consulted only when no pharmacy line
    /// matched directly. Keywords and chain names are uppercase.
    pub city_chain_hints: Vec<(String, String)>,
}

impl Default for RegionPolicy {
    /// The values observed in the original deployment (southeast Texas).
    fn default() -> Self {
        Self {
            default_area_code: Some("979".to_string()),
            area_code_repair_digit: Some('8'),
            city_chain_hints: vec![
                ("PINEHURST".to_string(), "WALGREENS".to_string()),
                ("MAGNOLIA".to_string(), "WALGREENS".to_string()),
                ("CONROE".to_string(), "WALGREENS".to_string()),
            ],
        }
    }
}

impl RegionPolicy {
    /// A policy with every regional guess turned off.
    pub fn disabled() -> Self {
        Self {
            default_area_code: None,
            area_code_repair_digit: None,
            city_chain_hints: Vec::new(),
        }
    }

    /// Look up a chain name hinted by a city keyword occurring in `line`.
    pub fn chain_for_city(&self, line: &str) -> Option<&str> {
        let upper = line.to_uppercase();
        self.city_chain_hints
            .iter()
            .find(|(city, _)| upper.contains(city.as_str()))
            .map(|(_, chain)| chain.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_carries_deployment_values() {
        let policy = RegionPolicy::default();
        assert_eq!(policy.default_area_code.as_deref(), Some("979"));
        assert_eq!(policy.area_code_repair_digit, Some('8'));
        assert_eq!(policy.chain_for_city("PINEHURST TX 77362"), Some("WALGREENS"));
    }

    #[test]
    fn disabled_turns_everything_off() {
        let policy = RegionPolicy::disabled();
        assert!(policy.default_area_code.is_none());
        assert!(policy.area_code_repair_digit.is_none());
        assert!(policy.chain_for_city("PINEHURST TX").is_none());
    }

    #[test]
    fn city_lookup_is_case_insensitive_on_input() {
        let policy = RegionPolicy::default();
        assert_eq!(policy.chain_for_city("Magnolia, TX"), Some("WALGREENS"));
        assert_eq!(policy.chain_for_city("HOUSTON TX"), None);
    }
}
