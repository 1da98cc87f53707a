use thiserror::Error;

/// Fallos al cargar el dataset. Todos equivalen a "no hay datos utilizables".
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("data file not found: {0}")]
    NotFound(String),
    #[error("the CSV file is empty: {0}")]
    Empty(String),
    #[error("unreadable dataset: {0}")]
    Decode(String),
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Decode(e.to_string())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SummaryError {
    #[error("missing expected column in dataset: {0}")]
    MissingColumn(String),
    #[error("dataset has no rows")]
    NoRows,
}
