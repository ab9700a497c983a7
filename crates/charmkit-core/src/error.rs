//! Core error types
//!
//! Two layers live here:
//! - [`SeriesError`]: the outcome of series resolution, with predicates so
//!   callers can branch on the kind of failure without reading messages
//! - [`CoreError`]: everything else the crate can fail with (I/O, charm
//!   content, external commands), plus series errors carried through `?`

use std::error::Error as StdError;

use thiserror::Error;

/// Series resolution failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// No series was requested and the charm does not declare any
    #[error("series not specified and charm does not define any")]
    Missing,

    /// The requested series is not in the charm's supported list
    #[error(transparent)]
    Unsupported(#[from] UnsupportedSeries),
}

impl SeriesError {
    /// Build an unsupported-series error without going through the resolver
    ///
    /// Other validation paths use this to report the same diagnostic shape.
    pub fn unsupported<S: AsRef<str>>(
        requested_series: impl Into<String>,
        supported_series: &[S],
    ) -> Self {
        Self::Unsupported(UnsupportedSeries {
            requested_series: requested_series.into(),
            supported_series: supported_series
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
        })
    }

    /// True for the "no series determinable" case
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// True when a requested series was rejected
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Details of the rejected request, if this is an unsupported-series error
    pub fn as_unsupported(&self) -> Option<&UnsupportedSeries> {
        match self {
            Self::Unsupported(details) => Some(details),
            Self::Missing => None,
        }
    }
}

/// A requested series together with the series the charm does support
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "series {:?} not supported by charm, supported series are: {}",
    .requested_series,
    .supported_series.join(",")
)]
pub struct UnsupportedSeries {
    requested_series: String,
    supported_series: Vec<String>,
}

impl UnsupportedSeries {
    pub fn requested_series(&self) -> &str {
        &self.requested_series
    }

    /// Supported series in declaration order
    pub fn supported_series(&self) -> &[String] {
        &self.supported_series
    }
}

/// Returns true if `err` is (or wraps, via [`CoreError::Series`]) a missing-series error
pub fn is_missing_series_error(err: &(dyn StdError + 'static)) -> bool {
    series_error(err).is_some_and(SeriesError::is_missing)
}

/// Returns true if `err` is (or wraps, via [`CoreError::Series`]) an unsupported-series error
pub fn is_unsupported_series_error(err: &(dyn StdError + 'static)) -> bool {
    err.downcast_ref::<UnsupportedSeries>().is_some()
        || series_error(err).is_some_and(SeriesError::is_unsupported)
}

fn series_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a SeriesError> {
    if let Some(series) = err.downcast_ref::<SeriesError>() {
        return Some(series);
    }
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::Series(series)) => Some(series),
        _ => None,
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("Invalid charm: {message}")]
    InvalidCharm { message: String },

    #[error("Invalid revision file content: {value:?}")]
    InvalidRevision { value: String },

    #[error("Failed to parse charm YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({status})")]
    CommandFailed {
        command: String,
        status: String,
        output: Vec<u8>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The underlying I/O error, for callers that branch on `ErrorKind`
    pub fn as_io(&self) -> Option<&std::io::Error> {
        match self {
            CoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message() {
        insta::assert_snapshot!(
            SeriesError::Missing.to_string(),
            @"series not specified and charm does not define any"
        );
    }

    #[test]
    fn test_unsupported_message() {
        let err = SeriesError::unsupported("precise", &["trusty", "xenial"]);
        insta::assert_snapshot!(
            err.to_string(),
            @r#"series "precise" not supported by charm, supported series are: trusty,xenial"#
        );
    }

    #[test]
    fn test_unsupported_accessors() {
        let err = SeriesError::unsupported("precise", &["trusty", "xenial"]);
        let details = err.as_unsupported().unwrap();

        assert_eq!(details.requested_series(), "precise");
        assert_eq!(details.supported_series(), ["trusty", "xenial"]);
        assert!(SeriesError::Missing.as_unsupported().is_none());
    }

    #[test]
    fn test_predicates_on_series_error() {
        assert!(is_missing_series_error(&SeriesError::Missing));
        assert!(!is_unsupported_series_error(&SeriesError::Missing));

        let unsupported = SeriesError::unsupported("precise", &["trusty"]);
        assert!(is_unsupported_series_error(&unsupported));
        assert!(!is_missing_series_error(&unsupported));
    }

    #[test]
    fn test_predicates_through_core_error() {
        let err: CoreError = SeriesError::Missing.into();
        assert!(is_missing_series_error(&err));

        let err: CoreError = SeriesError::unsupported("a", &["b"]).into();
        assert!(is_unsupported_series_error(&err));

        let details = SeriesError::unsupported("a", &["b"]).as_unsupported().cloned().unwrap();
        assert!(is_unsupported_series_error(&details));
    }

    #[test]
    fn test_predicates_ignore_lookalike_messages() {
        // Same text, different type: must not be classified.
        let io = std::io::Error::other("series not specified and charm does not define any");
        assert!(!is_missing_series_error(&io));

        let err = CoreError::InvalidCharm {
            message: "series \"x\" not supported by charm".to_string(),
        };
        assert!(!is_unsupported_series_error(&err));
    }

    #[test]
    fn test_predicates_on_boxed_errors() {
        let boxed: Box<dyn StdError + Send + Sync> =
            Box::new(CoreError::Series(SeriesError::Missing));
        assert!(is_missing_series_error(&*boxed));

        let boxed: Box<dyn StdError> = Box::new(SeriesError::unsupported("precise", &["xenial"]));
        let series = series_error(&*boxed).unwrap();
        assert_eq!(series.as_unsupported().unwrap().requested_series(), "precise");
    }
}
