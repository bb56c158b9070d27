// 🗂️ Listing Repository
// Loads the TSV source once; read-only for the rest of the process.

use crate::error::DashboardError;
use crate::filter::{self, Selection};
use crate::listing::{Listing, RawListing, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The loaded listings table, constructed once at start-up and shared by
/// reference with every consumer.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    source: PathBuf,
    listings: Vec<Listing>,
    boards: Vec<String>,
}

impl ListingRepository {
    /// Load the table from a tab-separated file.
    /// Any bad row fails the whole load; there is no partial table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DashboardError::data_load(path, None, e.to_string()))?;

        let repository = Self::from_reader(file, path)?;

        info!(
            path = %path.display(),
            rows = repository.len(),
            boards = repository.boards.len(),
            "listings loaded"
        );

        Ok(repository)
    }

    /// Parse tab-separated text from any reader. `source` is only used in
    /// error messages.
    pub fn from_reader<R: Read>(reader: R, source: impl Into<PathBuf>) -> Result<Self, DashboardError> {
        let source = source.into();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| DashboardError::data_load(&source, Some(1), e.to_string()))?
            .clone();

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(DashboardError::data_load(
                &source,
                Some(1),
                format!("missing required column '{}'", missing),
            ));
        }
        debug!(columns = headers.len(), "header validated");

        let mut listings = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line());
                DashboardError::data_load(&source, line, e.to_string())
            })?;
            let line = record.position().map(|p| p.line());

            let raw: RawListing = record
                .deserialize(Some(&headers))
                .map_err(|e| DashboardError::data_load(&source, line, e.to_string()))?;

            let listing = raw
                .into_listing()
                .map_err(|reason| DashboardError::data_load(&source, line, reason))?;

            listings.push(listing);
        }

        Ok(Self::with_source(listings, source))
    }

    /// Build a repository from rows already in memory
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self::with_source(listings, PathBuf::from("<memory>"))
    }

    fn with_source(listings: Vec<Listing>, source: PathBuf) -> Self {
        let mut boards: Vec<String> = Vec::new();
        for listing in &listings {
            if !boards.iter().any(|b| b == listing.listing_board()) {
                boards.push(listing.listing_board().to_string());
            }
        }

        ListingRepository {
            source,
            listings,
            boards,
        }
    }

    /// All rows, in file order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Distinct listing boards in order of first appearance
    pub fn boards(&self) -> &[String] {
        &self.boards
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Selection covering every board with no keyword
    pub fn default_selection(&self) -> Selection {
        Selection::all(&self.boards)
    }

    /// Rows passing `selection`, in file order
    pub fn filter(&self, selection: &Selection) -> Vec<Listing> {
        filter::filter(&self.listings, selection)
    }

    /// Rows with the given code (case-insensitive). Codes are not
    /// guaranteed unique, so this can return more than one row.
    pub fn find_by_code(&self, code: &str) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| l.code().eq_ignore_ascii_case(code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "code\tname\tlistingBoard\tshares\tlistingDate
BBCA\tBank Central Asia Tbk.\tMain\t123275050000\t2000-05-31
ARTO\tBank Jago Tbk.\tDevelopment\t13857702375\t2016-01-12
TLKM\tTelkom Indonesia (Persero) Tbk.\tMain\t99062216600\t1995-11-14
";

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_temp(SAMPLE);

        let repo = ListingRepository::load(file.path()).unwrap();

        assert_eq!(repo.len(), 3);
        assert_eq!(repo.source(), file.path());
        assert_eq!(repo.listings()[0].code(), "BBCA");
        assert_eq!(repo.listings()[2].year_of_listing(), 1995);
        assert_eq!(repo.boards(), ["Main".to_string(), "Development".to_string()]);
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let err = ListingRepository::load("/definitely/not/here/saham.txt").unwrap_err();

        match err {
            DashboardError::DataLoad { line, .. } => assert_eq!(line, None),
            other => panic!("expected DataLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_fails_whole_load() {
        let contents = format!("{}GOTO\tGoTo Gojek Tokopedia Tbk.\tMain\t1184000000000\tnot-a-date\n", SAMPLE);
        let file = write_temp(&contents);

        let err = ListingRepository::load(file.path()).unwrap_err();

        match err {
            DashboardError::DataLoad { line, reason, .. } => {
                assert_eq!(line, Some(5));
                assert!(reason.contains("not-a-date"), "reason: {}", reason);
            }
            other => panic!("expected DataLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let contents = "code\tname\tshares\tlistingDate\nBBCA\tBCA\t1\t2000-05-31\n";

        let err = ListingRepository::from_reader(contents.as_bytes(), "saham.txt").unwrap_err();

        assert!(err.to_string().contains("listingBoard"), "{}", err);
    }

    #[test]
    fn test_extra_columns_and_order_are_ignored() {
        let contents = "No\tlistingDate\tcode\tshares\tname\tlistingBoard\n\
1\t2010-07-15\tABCD\t1,000\tAbcd Tbk.\tMain\n";

        let repo = ListingRepository::from_reader(contents.as_bytes(), "saham.txt").unwrap();

        let listing = &repo.listings()[0];
        assert_eq!(listing.code(), "ABCD");
        assert_eq!(listing.shares(), 1_000);
        assert_eq!(listing.year_of_listing(), 2010);
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let contents = format!("{}WIFI\tSolusi Sinergi Digital Tbk.\n", SAMPLE);

        let err = ListingRepository::from_reader(contents.as_bytes(), "saham.txt").unwrap_err();

        assert!(matches!(err, DashboardError::DataLoad { .. }));
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let contents = "code\tname\tlistingBoard\tshares\tlistingDate\n";

        let repo = ListingRepository::from_reader(contents.as_bytes(), "saham.txt").unwrap();

        assert!(repo.is_empty());
        assert!(repo.boards().is_empty());
        assert!(aggregate(repo.listings()).unwrap_err().is_empty_selection());
    }

    #[test]
    fn test_filter_and_find_by_code() {
        let repo = ListingRepository::from_reader(SAMPLE.as_bytes(), "saham.txt").unwrap();

        let all = repo.filter(&repo.default_selection());
        assert_eq!(all.len(), 3);

        let main = repo.filter(&Selection::new(["Main"], None));
        assert_eq!(main.len(), 2);
        assert_eq!(aggregate(&main).unwrap().count, 2);

        assert_eq!(repo.find_by_code("bbca").len(), 1);
        assert!(repo.find_by_code("XXXX").is_empty());
    }
}
