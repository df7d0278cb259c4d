//! Error types.
//!
//! [`GaError`] covers everything the evolutionary engine can reject:
//! invalid configuration, operator contract violations and failed fitness
//! evaluations. [`DataError`] covers feature tables and [`ReportError`] the
//! report writer.
//!
//! Early stopping on stagnation is a normal termination mode and is *not*
//! represented here; see [`Termination`](crate::ga::Termination).

use thiserror::Error;

/// Errors raised by the GA engine.
#[derive(Debug, Error)]
pub enum GaError {
    /// A configuration bound is invalid. Raised before any generation is built.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An operator returned a genotype whose length differs from the problem's.
    #[error("operator `{operator}` produced a genotype of length {actual}, expected {expected}")]
    GenotypeLength {
        operator: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The fitness function returned a value that cannot be ranked (NaN).
    #[error("fitness of genotype {key} is not comparable: {value}")]
    NonComparableFitness { key: String, value: f64 },

    /// The fitness function failed. The run is aborted.
    #[error("fitness evaluation failed for genotype {key}")]
    Evaluation {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// A generation was requested before the first one was built.
    #[error("no generation exists yet; create the first generation before stepping")]
    NotInitialized,

    /// The engine already terminated.
    #[error("the run has already terminated")]
    Terminated,
}

/// Errors raised while building or loading a feature table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Column names and column data disagree in count, or columns differ in length.
    #[error("malformed table: {0}")]
    Shape(String),

    /// A cell could not be parsed as a number.
    #[error("row {row}, column `{column}`: cannot parse {value:?} as a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },
}

/// Errors raised while writing a run report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A candidate's genotype does not match the report's column header.
    #[error("row {row} has {actual} genes but the report declares {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_evaluation_error_keeps_source() {
        let err = GaError::Evaluation {
            key: "0110".into(),
            source: anyhow::anyhow!("clustering diverged"),
        };
        assert_eq!(
            err.to_string(),
            "fitness evaluation failed for genotype 0110"
        );
        let source = err.source().expect("source must be attached");
        assert_eq!(source.to_string(), "clustering diverged");
    }

    #[test]
    fn test_genotype_length_message() {
        let err = GaError::GenotypeLength {
            operator: "mutate",
            expected: 8,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "operator `mutate` produced a genotype of length 7, expected 8"
        );
    }
}
