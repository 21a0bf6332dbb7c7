use serde::{Deserialize, Serialize};

/// Company profile data from the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub symbol: String,

    /// Company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Listing exchange as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Provider industry classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Company website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// Market capitalization in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}
