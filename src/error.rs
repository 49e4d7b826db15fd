//! Error type shared by every stage of the planner.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading inputs, talking to OSRM, or planning routes.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Filesystem or stream failure.
    Io(std::io::Error),
    /// Malformed CSV input, with a description of the offending record.
    Csv(String),
    /// JSON encode/decode failure (config files, GeoJSON output).
    Json(serde_json::Error),
    /// Transport failure or undecodable response from an HTTP service.
    Http(String),
    /// OSRM answered with a non-`Ok` code.
    Service {
        /// OSRM response code, e.g. `NoRoute`, `InvalidQuery`.
        code: String,
        /// Optional human-readable message from the server.
        message: Option<String>,
    },
    /// No route exists between two locations of a travel matrix.
    Unroutable {
        /// Source location index.
        from: usize,
        /// Destination location index.
        to: usize,
    },
    /// A matrix has the wrong shape or contents.
    Matrix(String),
    /// An encoded polyline could not be decoded.
    Polyline(String),
    /// A caller-supplied argument is out of range.
    InvalidArgument(String),
    /// The planner configuration is inconsistent.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Csv(message) => write!(f, "csv error: {message}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Http(message) => write!(f, "http error: {message}"),
            Self::Service { code, message } => match message {
                Some(message) => write!(f, "osrm returned `{code}`: {message}"),
                None => write!(f, "osrm returned `{code}`"),
            },
            Self::Unroutable { from, to } => {
                write!(f, "no route between locations {from} and {to}")
            }
            Self::Matrix(message) => write!(f, "matrix error: {message}"),
            Self::Polyline(message) => write!(f, "polyline error: {message}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Config(message) => write!(f, "config error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_display() {
        let err = Error::Service {
            code: "NoRoute".to_string(),
            message: Some("Impossible route between points".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "osrm returned `NoRoute`: Impossible route between points"
        );
    }

    #[test]
    fn test_unroutable_display() {
        let err = Error::Unroutable { from: 3, to: 7 };
        assert_eq!(err.to_string(), "no route between locations 3 and 7");
    }

    #[test]
    fn test_io_source() {
        use std::error::Error as _;
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
    }
}
