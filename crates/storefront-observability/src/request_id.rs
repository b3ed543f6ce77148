//! Request identifiers for log correlation.

use std::fmt;

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied id that is accepted as-is.
const MAX_LEN: usize = 128;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random (v4 UUID) request id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Reuse an id supplied by a client or proxy.
    ///
    /// Empty, oversized or non-printable values are replaced by a fresh id
    /// so they cannot corrupt log lines.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id)
                if !id.is_empty()
                    && id.len() <= MAX_LEN
                    && id.chars().all(|c| c.is_ascii_graphic()) =>
            {
                Self(id.to_string())
            }
            _ => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_from_header_keeps_valid_id() {
        let id = RequestId::from_header(Some(" req-42 "));
        assert_eq!(id.as_str(), "req-42");
    }

    #[test]
    fn test_from_header_replaces_bad_values() {
        for bad in [None, Some(""), Some("has space"), Some("line\nbreak")] {
            let id = RequestId::from_header(bad);
            assert_eq!(id.as_str().len(), 36, "{bad:?}");
        }

        let long = "x".repeat(MAX_LEN + 1);
        assert_ne!(RequestId::from_header(Some(&long)).as_str(), long);
    }
}
