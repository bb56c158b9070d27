use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the listing repository and its aggregations.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source table could not be loaded. Fatal: nothing is rendered.
    #[error("failed to load {}{}: {reason}", .path.display(), fmt_line(.line))]
    DataLoad {
        path: PathBuf,
        /// 1-based line in the source file, when the failure is row-specific
        line: Option<u64>,
        reason: String,
    },

    /// An aggregate was requested over zero rows.
    #[error("no listings match the current selection")]
    EmptySelection,
}

impl DashboardError {
    pub(crate) fn data_load(path: impl Into<PathBuf>, line: Option<u64>, reason: impl Into<String>) -> Self {
        DashboardError::DataLoad {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn is_empty_selection(&self) -> bool {
        matches!(self, DashboardError::EmptySelection)
    }
}

fn fmt_line(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_load_message_includes_line() {
        let err = DashboardError::data_load("saham.txt", Some(4), "unparseable listingDate 'x'");
        assert_eq!(
            err.to_string(),
            "failed to load saham.txt (line 4): unparseable listingDate 'x'"
        );
    }

    #[test]
    fn test_data_load_message_without_line() {
        let err = DashboardError::data_load("missing.txt", None, "No such file or directory");
        assert_eq!(err.to_string(), "failed to load missing.txt: No such file or directory");
        assert!(!err.is_empty_selection());
        assert!(DashboardError::EmptySelection.is_empty_selection());
    }
}
