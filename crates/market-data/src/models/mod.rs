//! Market data models
//!
//! - `quote` - Real-time quote and 52-week range (ProviderQuote, WeekRange)
//! - `profile` - Company profile data (CompanyProfile)
//! - `search` - Search result data (SearchResult)

mod profile;
mod quote;
mod search;

pub use profile::CompanyProfile;
pub use quote::{ProviderQuote, WeekRange};
pub use search::SearchResult;
