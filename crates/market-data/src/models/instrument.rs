use serde::{Deserialize, Serialize};

/// One entry in an instrument's fallback order: which adapter to ask, and
/// optionally the exact provider symbol to ask for.
///
/// The same adapter may appear several times with different symbols; each
/// entry is tried independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Adapter id (e.g. "YAHOO", "MORNINGSTAR_DK")
    pub provider: String,

    /// Explicit provider symbol. `None` means resolve via search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl SourceSpec {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// A configured instrument: stable identity plus the ordered list of
/// sources to try for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable logical name, also the display name
    pub name: String,

    /// ISIN when known (funds usually have one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,

    /// Currency assumed when a source does not report one
    pub currency: String,

    /// Fallback order; earlier entries are preferred
    pub sources: Vec<SourceSpec>,
}

impl Instrument {
    /// Query string for symbol search: ISIN when present, else the name.
    pub fn search_query(&self) -> &str {
        self.isin.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_prefers_isin() {
        let instrument = Instrument {
            name: "Nordea Invest Global Enhanced".to_string(),
            isin: Some("DK0060949964".to_string()),
            currency: "DKK".to_string(),
            sources: vec![SourceSpec::new("YAHOO")],
        };
        assert_eq!(instrument.search_query(), "DK0060949964");
    }

    #[test]
    fn search_query_falls_back_to_name() {
        let instrument = Instrument {
            name: "Nordea Invest Global Enhanced".to_string(),
            isin: None,
            currency: "DKK".to_string(),
            sources: vec![],
        };
        assert_eq!(instrument.search_query(), "Nordea Invest Global Enhanced");
    }
}
