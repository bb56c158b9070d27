// 📉 Chart inputs - histogram buckets and board composition
// The renderer (terminal bar chart, browser) only draws these.

use crate::listing::Listing;
use serde::Serialize;
use std::collections::HashMap;

/// Bucket count of the shares histogram unless configured otherwise
pub const DEFAULT_SHARES_BINS: usize = 50;

/// Upper bound on the shares histogram bucket count
pub const MAX_SHARES_BINS: usize = 1_000;

/// One histogram bar covering `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub buckets: Vec<Bucket>,
}

impl Histogram {
    /// Sum of all bucket counts
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// One slice of the listing board composition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardShare {
    pub board: String,
    pub count: usize,
    /// Share of all rows, 0-100
    pub percent: f64,
}

pub fn shares_column(table: &[Listing]) -> Vec<u64> {
    table.iter().map(Listing::shares).collect()
}

pub fn year_column(table: &[Listing]) -> Vec<i32> {
    table.iter().map(Listing::year_of_listing).collect()
}

/// Equal-width histogram of shares outstanding over `[min, max]`.
/// `bins` is clamped to `1..=MAX_SHARES_BINS`.
pub fn shares_histogram(table: &[Listing], bins: usize) -> Histogram {
    let values: Vec<f64> = table.iter().map(|l| l.shares() as f64).collect();
    equal_width_histogram(&values, bins.clamp(1, MAX_SHARES_BINS))
}

/// One bucket per calendar year from the earliest to the latest listing,
/// including years with no listings
pub fn year_histogram(table: &[Listing]) -> Histogram {
    let years = year_column(table);
    let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) else {
        return Histogram::default();
    };

    let mut counts = vec![0usize; (max - min) as usize + 1];
    for year in years {
        counts[(year - min) as usize] += 1;
    }

    Histogram {
        buckets: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let start = (min + i as i32) as f64;
                Bucket { start, end: start + 1.0, count }
            })
            .collect(),
    }
}

/// Rows per listing board, largest first (ties by board name)
pub fn board_composition(table: &[Listing]) -> Vec<BoardShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for listing in table {
        *counts.entry(listing.listing_board()).or_insert(0) += 1;
    }

    let total = table.len() as f64;
    let mut result: Vec<BoardShare> = counts
        .into_iter()
        .map(|(board, count)| BoardShare {
            board: board.to_string(),
            count,
            percent: count as f64 / total * 100.0,
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.board.cmp(&b.board)));
    result
}

fn equal_width_histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() {
        return Histogram::default();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // All values equal: a single unit-wide bucket
    if max <= min {
        return Histogram {
            buckets: vec![Bucket { start: min, end: min + 1.0, count: values.len() }],
        };
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    Histogram {
        buckets: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bucket {
                start: min + width * i as f64,
                end: min + width * (i + 1) as f64,
                count,
            })
            .collect(),
    }
}

/// Short human form of a large number: 1.2K, 3.4M, 5.6B, 7.8T
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.1}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn listing(code: &str, board: &str, shares: u64, year: i32) -> Listing {
        Listing::new(
            code,
            format!("{} Tbk.", code),
            board,
            shares,
            NaiveDate::from_ymd_opt(year, 1, 2).unwrap(),
        )
    }

    fn sample_table() -> Vec<Listing> {
        vec![
            listing("AAAA", "Main", 0, 1990),
            listing("BBBB", "Main", 100, 1992),
            listing("CCCC", "Development", 250, 1992),
            listing("DDDD", "Main", 1_000, 1995),
            listing("EEEE", "Acceleration", 1_000, 1995),
        ]
    }

    #[test]
    fn test_columns_follow_table_order() {
        let table = sample_table();

        assert_eq!(shares_column(&table), vec![0, 100, 250, 1_000, 1_000]);
        assert_eq!(year_column(&table), vec![1990, 1992, 1992, 1995, 1995]);
    }

    #[test]
    fn test_shares_histogram_counts_every_row() {
        let table = sample_table();

        let histogram = shares_histogram(&table, 4);

        assert_eq!(histogram.buckets.len(), 4);
        assert_eq!(histogram.total(), table.len());
        assert_eq!(histogram.buckets[0].start, 0.0);
        assert_eq!(histogram.buckets[3].end, 1_000.0);
        // 0 and 100 in [0, 250); 250 in [250, 500); max lands in the last bucket
        let counts: Vec<usize> = histogram.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 2]);
    }

    #[test]
    fn test_shares_histogram_degenerate_inputs() {
        assert!(shares_histogram(&[], DEFAULT_SHARES_BINS).is_empty());

        let same = vec![listing("AAAA", "Main", 7, 2000), listing("BBBB", "Main", 7, 2001)];
        let histogram = shares_histogram(&same, DEFAULT_SHARES_BINS);
        assert_eq!(histogram.buckets.len(), 1);
        assert_eq!(histogram.buckets[0].count, 2);

        // Zero bins is treated as one
        let histogram = shares_histogram(&sample_table(), 0);
        assert_eq!(histogram.buckets.len(), 1);
        assert_eq!(histogram.total(), 5);
    }

    #[test]
    fn test_shares_histogram_bucket_count_is_capped() {
        let histogram = shares_histogram(&sample_table(), usize::MAX);
        assert_eq!(histogram.buckets.len(), MAX_SHARES_BINS);
        assert_eq!(histogram.total(), 5);

        let histogram = shares_histogram(&sample_table(), 1 << 40);
        assert_eq!(histogram.buckets.len(), MAX_SHARES_BINS);
    }

    #[test]
    fn test_year_histogram_has_one_bucket_per_year() {
        let histogram = year_histogram(&sample_table());

        let years: Vec<f64> = histogram.buckets.iter().map(|b| b.start).collect();
        assert_eq!(years, vec![1990.0, 1991.0, 1992.0, 1993.0, 1994.0, 1995.0]);
        let counts: Vec<usize> = histogram.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 2, 0, 0, 2]);
        assert_eq!(histogram.max_count(), 2);

        assert!(year_histogram(&[]).is_empty());
    }

    #[test]
    fn test_board_composition_sorted_by_count() {
        let composition = board_composition(&sample_table());

        let boards: Vec<(&str, usize)> = composition
            .iter()
            .map(|s| (s.board.as_str(), s.count))
            .collect();
        assert_eq!(
            boards,
            vec![("Main", 3), ("Acceleration", 1), ("Development", 1)]
        );

        let total: f64 = composition.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((composition[0].percent - 60.0).abs() < 1e-9);

        assert!(board_composition(&[]).is_empty());
    }

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(950.0), "950");
        assert_eq!(compact_number(1_500.0), "1.5K");
        assert_eq!(compact_number(2_340_000.0), "2.3M");
        assert_eq!(compact_number(123_275_050_000.0), "123.3B");
        assert_eq!(compact_number(1_184_000_000_000.0), "1.2T");
    }
}
