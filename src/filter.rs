// 🔎 Filtering - listing board + name/code search
// Pure function of (table, selection); the core holds no UI state.

use crate::listing::Listing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The user's current filter choices, passed explicitly from the
/// presentation layer on every recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Boards to include. Empty means nothing matches, not "no filter".
    pub boards: BTreeSet<String>,
    /// Case-insensitive substring of name or code. Empty/None = no filter.
    pub keyword: Option<String>,
}

impl Selection {
    pub fn new<I, S>(boards: I, keyword: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection {
            boards: boards.into_iter().map(Into::into).collect(),
            keyword: keyword.map(str::to_string),
        }
    }

    /// Every board, no keyword (the dashboard's initial state)
    pub fn all(boards: &[String]) -> Self {
        Selection::new(boards.iter().cloned(), None)
    }

    /// Builder pattern: set keyword
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.set_keyword(keyword);
        self
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword = Some(keyword.to_string());
    }

    /// The keyword if it actually filters anything
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    pub fn is_board_selected(&self, board: &str) -> bool {
        self.boards.contains(board)
    }

    /// Flip a board in or out of the selection; returns whether it is now selected
    pub fn toggle_board(&mut self, board: &str) -> bool {
        if self.boards.remove(board) {
            false
        } else {
            self.boards.insert(board.to_string());
            true
        }
    }

    pub fn select_all_boards(&mut self, boards: &[String]) {
        self.boards.extend(boards.iter().cloned());
    }

    pub fn clear_boards(&mut self) {
        self.boards.clear();
    }

    /// Whether a single listing passes both predicates
    pub fn matches(&self, listing: &Listing) -> bool {
        let needle = self.keyword().map(str::to_lowercase);
        self.matches_lowered(listing, needle.as_deref())
    }

    fn matches_lowered(&self, listing: &Listing, needle: Option<&str>) -> bool {
        if !self.boards.contains(listing.listing_board()) {
            return false;
        }

        match needle {
            Some(needle) => {
                listing.name().to_lowercase().contains(needle)
                    || listing.code().to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

/// Rows of `table` that pass `selection`, in table order.
pub fn filter(table: &[Listing], selection: &Selection) -> Vec<Listing> {
    let needle = selection.keyword().map(str::to_lowercase);

    table
        .iter()
        .filter(|listing| selection.matches_lowered(listing, needle.as_deref()))
        .cloned()
        .collect()
}
