use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {field}={value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("click ({row}, {col}) is outside the {rows}x{columns} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        columns: usize,
    },
}
