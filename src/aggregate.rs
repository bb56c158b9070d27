// 📊 Summary metrics over a (possibly filtered) listings table

use crate::error::DashboardError;
use crate::listing::Listing;
use serde::Serialize;

/// The three dashboard metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of issuers in the table
    pub count: usize,
    /// Code of the issuer with the most shares (first one on ties)
    pub top_by_shares: String,
    /// Shares held by `top_by_shares`
    pub top_shares: u64,
    /// Earliest year of listing
    pub earliest_year: i32,
}

impl Summary {
    /// Count with thousands separators, e.g. "1,234"
    pub fn formatted_count(&self) -> String {
        format_thousands(self.count as u64)
    }
}

/// Compute the summary metrics. Fails with `EmptySelection` on an empty table.
pub fn aggregate(table: &[Listing]) -> Result<Summary, DashboardError> {
    let top = table
        .iter()
        .reduce(|best, listing| if listing.shares() > best.shares() { listing } else { best })
        .ok_or(DashboardError::EmptySelection)?;

    let earliest_year = table
        .iter()
        .map(Listing::year_of_listing)
        .min()
        .ok_or(DashboardError::EmptySelection)?;

    Ok(Summary {
        count: table.len(),
        top_by_shares: top.code().to_string(),
        top_shares: top.shares(),
        earliest_year,
    })
}

/// Format an integer with `,` thousands separators
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn listing(code: &str, shares: u64, year: i32) -> Listing {
        Listing::new(
            code,
            format!("{} Tbk.", code),
            "Main",
            shares,
            NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
        )
    }

    #[test]
    fn test_aggregate_non_empty_table() {
        let table = vec![
            listing("TLKM", 99_062_216_600, 1995),
            listing("BBRI", 151_559_001_604, 2003),
            listing("UNVR", 38_150_000_000, 1982),
        ];

        let summary = aggregate(&table).unwrap();

        assert_eq!(summary.count, table.len());
        assert_eq!(summary.top_by_shares, "BBRI");
        assert_eq!(summary.top_shares, table.iter().map(|l| l.shares()).max().unwrap());
        assert_eq!(summary.earliest_year, 1982);
    }

    #[test]
    fn test_aggregate_empty_table_is_empty_selection() {
        let err = aggregate(&[]).unwrap_err();
        assert!(err.is_empty_selection());
    }

    #[test]
    fn test_top_by_shares_tie_goes_to_first_row() {
        let table = vec![
            listing("AAAA", 500, 2001),
            listing("BBBB", 900, 2002),
            listing("CCCC", 900, 2003),
        ];

        assert_eq!(aggregate(&table).unwrap().top_by_shares, "BBBB");
    }

    #[test]
    fn test_single_row() {
        let summary = aggregate(&[listing("GOTO", 0, 2022)]).unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(summary.top_by_shares, "GOTO");
        assert_eq!(summary.earliest_year, 2022);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(123_275_050_000), "123,275,050,000");
    }
}
