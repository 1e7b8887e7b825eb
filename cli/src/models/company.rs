use serde::{Deserialize, Serialize};

const NOT_AVAILABLE: &str = "N/A";

/// Basic company metadata. Every field is optional because providers omit
/// them freely (indices, currencies and ETFs have no sector, for example).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub long_name: Option<String>,
    pub country: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
}

impl CompanyProfile {
    pub fn unknown(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        or_na(&self.long_name)
    }

    pub fn country(&self) -> &str {
        or_na(&self.country)
    }

    pub fn sector(&self) -> &str {
        or_na(&self.sector)
    }

    pub fn industry(&self) -> &str {
        or_na(&self.industry)
    }

    pub fn website(&self) -> &str {
        or_na(&self.website)
    }

    pub fn currency(&self) -> &str {
        or_na(&self.currency)
    }

    pub fn exchange(&self) -> &str {
        or_na(&self.exchange)
    }

    /// Label/value pairs in display order.
    pub fn summary_rows(&self) -> [(&'static str, &str); 4] {
        [
            ("Company Name", self.name()),
            ("Country", self.country()),
            ("Sector", self.sector()),
            ("Industry", self.industry()),
        ]
    }
}

fn or_na(field: &Option<String>) -> &str {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_na() {
        let profile = CompanyProfile::unknown("^GSPC");
        assert_eq!(profile.name(), "N/A");
        assert_eq!(profile.sector(), "N/A");
        assert_eq!(profile.industry(), "N/A");
        assert_eq!(profile.country(), "N/A");
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let profile = CompanyProfile {
            symbol: "AAPL".to_string(),
            long_name: Some("Apple Inc.".to_string()),
            sector: Some("  ".to_string()),
            ..CompanyProfile::default()
        };
        assert_eq!(profile.name(), "Apple Inc.");
        assert_eq!(profile.sector(), "N/A");
        assert_eq!(profile.summary_rows()[0], ("Company Name", "Apple Inc."));
    }
}
