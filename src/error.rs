// Typed failures of the sampling core.

use std::path::PathBuf;

/// Failure to produce a counter snapshot. Both variants are fatal for the cycle.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The counter table could not be opened or read.
    #[error("reading counter source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A selected interface carried a byte field that is not a non-negative decimal integer.
    #[error("interface {interface}: field {field} is not a byte counter: {value:?}")]
    Parse {
        interface: String,
        field: usize,
        value: String,
    },
}

/// Elapsed time between two snapshots was not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("non-positive elapsed time between samples: {elapsed}s")]
pub struct TimeError {
    pub elapsed: i64,
}
