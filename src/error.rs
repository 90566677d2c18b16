use std::path::PathBuf;

/// Errors the ETL pipeline distinguishes. Everything here is fatal for the
/// step that raised it; only the provider-mapping step downgrades a missing
/// input file to a per-provider skip.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    /// A field expected to hold a structured literal (genres,
    /// production_countries) or a numeric column could not be parsed.
    #[error("{}:{line}: {detail}", file.display())]
    Parse {
        file: PathBuf,
        line: u64,
        detail: String,
    },

    /// A row does not match the fixed positional schema.
    #[error("{}:{line}: expected {expected} columns, found {found}", file.display())]
    Schema {
        file: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A declared input file is missing or unreadable.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl EtlError {
    pub fn parse(file: impl Into<PathBuf>, line: u64, detail: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a missing file, which the
    /// provider-mapping step treats as skippable.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;
