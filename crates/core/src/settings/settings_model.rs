use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Site-wide configuration row. There is only ever one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub finnhub_api_key: String,
    pub updated_at: Option<NaiveDateTime>,
}

impl SiteConfig {
    /// True when a non-blank key is stored.
    pub fn has_key(&self) -> bool {
        !self.finnhub_api_key.trim().is_empty()
    }

    /// Key obfuscated for display.
    ///
    /// Empty keys stay empty, keys of up to six characters show only their
    /// last two, longer keys keep the first three and last three.
    pub fn masked_key(&self) -> String {
        let key: Vec<char> = self.finnhub_api_key.trim().chars().collect();
        if key.is_empty() {
            return String::new();
        }
        if key.len() <= 6 {
            let tail: String = key[key.len().saturating_sub(2)..].iter().collect();
            return format!("***{}", tail);
        }
        let head: String = key[..3].iter().collect();
        let tail: String = key[key.len() - 3..].iter().collect();
        format!("{}***{}", head, tail)
    }

    pub fn view(&self) -> SiteConfigView {
        SiteConfigView {
            has_key: self.has_key(),
            masked: self.masked_key(),
            updated_at: self.updated_at.map(|t| t.and_utc().timestamp()),
        }
    }
}

/// What clients get to see of the site configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigView {
    pub has_key: bool,
    pub masked: String,
    /// Unix seconds of the last change.
    pub updated_at: Option<i64>,
}

/// Payload for changing the API key. A blank key clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigUpdate {
    #[serde(default, alias = "finnhub_api_key")]
    pub finnhub_api_key: String,
}
