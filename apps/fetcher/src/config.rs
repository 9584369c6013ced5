//! Instrument configuration file.
//!
//! The file is plain JSON so the same document can be edited by hand
//! and checked into the site repository next to the snapshot it feeds:
//!
//! ```json
//! {
//!   "instruments": [
//!     {
//!       "name": "Nordea Invest Global Enhanced",
//!       "isin": "DK0060949964",
//!       "currency": "DKK",
//!       "sources": [
//!         { "provider": "YAHOO", "symbol": "0P0001P9Q1.CO" },
//!         { "provider": "MORNINGSTAR_DK" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use fondkurs_market_data::Instrument;

#[derive(Debug, Deserialize)]
pub struct FetcherConfig {
    pub instruments: Vec<Instrument>,
}

impl FetcherConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        if config.instruments.is_empty() {
            anyhow::bail!("configuration {} lists no instruments", path.display());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_instruments_with_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fondkurs.json");
        std::fs::write(
            &path,
            r#"{
                "instruments": [
                    {
                        "name": "Nordea Invest Global Enhanced",
                        "isin": "DK0060949964",
                        "currency": "DKK",
                        "sources": [
                            { "provider": "YAHOO", "symbol": "0P0001P9Q1.CO" },
                            { "provider": "MORNINGSTAR_DK" }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let config = FetcherConfig::load(&path).unwrap();
        assert_eq!(config.instruments.len(), 1);
        let instrument = &config.instruments[0];
        assert_eq!(instrument.isin.as_deref(), Some("DK0060949964"));
        assert_eq!(instrument.sources.len(), 2);
        assert_eq!(instrument.sources[0].symbol.as_deref(), Some("0P0001P9Q1.CO"));
        assert!(instrument.sources[1].symbol.is_none());
    }

    #[test]
    fn empty_instrument_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fondkurs.json");
        std::fs::write(&path, r#"{ "instruments": [] }"#).unwrap();

        assert!(FetcherConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FetcherConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
