/// Decimal places kept for lot quantity and price
pub const LOT_DECIMAL_PLACES: u32 = 4;

/// Digits allowed before the decimal point of a lot quantity or price
pub const LOT_MAX_INTEGER_DIGITS: u32 = 16;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Maximum length of a sector name
pub const SECTOR_NAME_MAX_LEN: usize = 100;

/// Maximum length of a ticker's company name
pub const COMPANY_NAME_MAX_LEN: usize = 200;

/// Maximum length of a ticker's security type
pub const SECURITY_TYPE_MAX_LEN: usize = 50;

/// Default security type for new tickers
pub const DEFAULT_SECURITY_TYPE: &str = "Common Stock";

/// Maximum length of lot notes
pub const LOT_NOTES_MAX_LEN: usize = 255;

/// Maximum length of a stored provider API key
pub const API_KEY_MAX_LEN: usize = 128;

/// Maximum number of symbol search results returned to clients
pub const SEARCH_RESULT_LIMIT: usize = 20;

/// Exchange filter applied to symbol search
pub const SEARCH_EXCHANGE: &str = "US";
