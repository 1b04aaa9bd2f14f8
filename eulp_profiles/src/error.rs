use polars::prelude::PolarsError;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    /// A selection label that is not present in one of the reference tables.
    #[error("'{key}' not found in {table} table")]
    Lookup { table: &'static str, key: String },

    #[error("data lake returned status {status}")]
    FetchMiss { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected file layout: {0}")]
    Schema(String),

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("no tables to combine")]
    EmptyInput,

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid dataset config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl ProfileError {
    pub(crate) fn lookup(table: &'static str, key: &str) -> Self {
        Self::Lookup {
            table,
            key: key.to_string(),
        }
    }

    /// Per-combination failures that the batch loop reports and skips.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FetchMiss { .. }
                | Self::Transport(_)
                | Self::Schema(_)
                | Self::Timestamp(_)
                | Self::Polars(_)
        )
    }
}
