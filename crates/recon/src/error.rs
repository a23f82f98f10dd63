use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SyncError {
    /// Source location does not exist.
    NotFound(PathBuf),
    /// Expected worksheet/table/column is absent from the source.
    Format(String),
    /// Remote session or transport failure.
    Gateway(String),
    /// Report could not be written.
    Persistence { path: PathBuf, message: String },
}

impl SyncError {
    pub fn persistence(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "source not found: {}", path.display()),
            Self::Format(msg) => write!(f, "source format error: {msg}"),
            Self::Gateway(msg) => write!(f, "gateway error: {msg}"),
            Self::Persistence { path, message } => {
                write!(f, "cannot write report {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SyncError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_path() {
        let err = SyncError::persistence("/tmp/out/report.json", "permission denied");
        assert_eq!(
            err.to_string(),
            "cannot write report /tmp/out/report.json: permission denied"
        );
        assert_eq!(
            SyncError::NotFound(PathBuf::from("vendors.xlsx")).to_string(),
            "source not found: vendors.xlsx"
        );
    }
}
