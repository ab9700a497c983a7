//! Series selection for charm deployments

use crate::charm::Charm;
use crate::error::SeriesError;

/// Pick the series a charm should be deployed to
///
/// - A charm declaring no series (legacy) accepts any requested series, but
///   one must be requested.
/// - An empty request falls back to the charm's first declared series.
/// - Otherwise the request must match one of the declared series exactly.
pub fn series_for_charm<S: AsRef<str>>(
    requested_series: &str,
    supported_series: &[S],
) -> Result<String, SeriesError> {
    let Some(default_series) = supported_series.first() else {
        if requested_series.is_empty() {
            return Err(SeriesError::Missing);
        }
        return Ok(requested_series.to_string());
    };

    if requested_series.is_empty() {
        return Ok(default_series.as_ref().to_string());
    }

    if supported_series.iter().any(|s| s.as_ref() == requested_series) {
        return Ok(requested_series.to_string());
    }

    Err(SeriesError::unsupported(requested_series, supported_series))
}

/// [`series_for_charm`] against the series declared in a charm's metadata
pub fn series_for<C: Charm + ?Sized>(
    charm: &C,
    requested_series: &str,
) -> Result<String, SeriesError> {
    series_for_charm(requested_series, &charm.meta().series)
}
