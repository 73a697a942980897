use jiff::Span;
use thiserror::Error;

/// The error type for all fallible period operations.
///
/// None of the failures here are transient: they are input or programmer
/// errors, and they surface to the caller immediately.
#[derive(Debug, Error)]
pub enum Error {
    /// A textual datetime or period could not be parsed.
    ///
    /// The underlying Jiff error is propagated unchanged.
    #[error("failed to parse datetime")]
    Parse(#[source] jiff::Error),

    /// An iteration entry point was given a zero or negative interval.
    ///
    /// Advancing a cursor by such an interval never reaches the end of the
    /// parent period, so this is rejected up front instead of looping
    /// forever.
    #[error("iteration interval `{interval}` is not positive")]
    InvalidInterval {
        /// The offending interval.
        interval: Span,
    },

    /// Calendar arithmetic moved a datetime outside Jiff's supported
    /// range.
    #[error("datetime arithmetic outside supported range")]
    Arithmetic(#[source] jiff::Error),
}
