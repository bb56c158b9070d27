// 📈 Listing - one row of the BEI listings table
// Raw TSV row → typed Listing with derived year of listing

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Columns every source file must carry (extra columns are ignored)
pub const REQUIRED_COLUMNS: [&str; 5] = ["code", "name", "listingBoard", "shares", "listingDate"];

// ============================================================================
// LISTING
// ============================================================================

/// A listed issuer (emiten).
///
/// `year_of_listing` is derived from `listing_date` at construction and
/// cannot be set on its own, so the two never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    code: String,
    name: String,
    listing_board: String,
    shares: u64,
    listing_date: NaiveDate,
    year_of_listing: i32,
}

impl Listing {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        listing_board: impl Into<String>,
        shares: u64,
        listing_date: NaiveDate,
    ) -> Self {
        Listing {
            code: code.into(),
            name: name.into(),
            listing_board: listing_board.into(),
            shares,
            listing_date,
            year_of_listing: listing_date.year(),
        }
    }

    /// Ticker code, e.g. "BBCA"
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Issuer name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn listing_board(&self) -> &str {
        &self.listing_board
    }

    /// Shares outstanding at listing
    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn listing_date(&self) -> NaiveDate {
        self.listing_date
    }

    pub fn year_of_listing(&self) -> i32 {
        self.year_of_listing
    }
}

// ============================================================================
// RAW ROW
// ============================================================================

/// RawListing - a row exactly as it appears in the TSV, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct RawListing {
    pub code: String,
    pub name: String,
    #[serde(rename = "listingBoard")]
    pub listing_board: String,
    pub shares: String,
    #[serde(rename = "listingDate")]
    pub listing_date: String,
}

impl RawListing {
    /// Validate the raw strings and build a Listing.
    /// Returns the reason on failure; the caller attaches file position.
    pub fn into_listing(self) -> Result<Listing, String> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err("empty code".to_string());
        }

        let shares = parse_shares(&self.shares)
            .ok_or_else(|| format!("invalid shares '{}' for {}", self.shares, code))?;

        let listing_date = parse_listing_date(&self.listing_date)
            .ok_or_else(|| format!("unparseable listingDate '{}' for {}", self.listing_date, code))?;

        Ok(Listing::new(
            code,
            self.name.trim(),
            self.listing_board.trim(),
            shares,
            listing_date,
        ))
    }
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

/// Parse a listing date (supports YYYY-MM-DD, ISO datetimes and MM/DD/YYYY)
pub fn parse_listing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    // Try YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // Try datetimes as exported by spreadsheets and pandas
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }

    // Try MM/DD/YYYY
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

/// Parse a share count: "1,234", "1234" and "1234.0" are all 1234
pub fn parse_shares(raw: &str) -> Option<u64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();

    let integral = match cleaned.split_once('.') {
        Some((whole, fraction)) if !fraction.is_empty() && fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => cleaned.as_str(),
    };

    if integral.is_empty() || !integral.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    integral.parse().ok()
}
