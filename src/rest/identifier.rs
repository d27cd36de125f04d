//! References to a single tracking.

use std::fmt;

use crate::clients::MissingIdentifierError;

/// Identifies a single tracking, either by its opaque ID or by courier slug
/// and tracking number.
///
/// # Example
///
/// ```rust
/// use aftership_api::rest::TrackingIdentifier;
///
/// let by_id = TrackingIdentifier::by_id("5b74f4958776db0e00b6f5ed");
/// assert_eq!(by_id.uri_path().unwrap(), "/5b74f4958776db0e00b6f5ed");
///
/// let by_number = TrackingIdentifier::by_slug_and_number("dhl", "RA123456789CN");
/// assert_eq!(by_number.uri_path().unwrap(), "/dhl/RA123456789CN");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrackingIdentifier {
    /// The unique ID AfterShip generated for the tracking.
    ById(String),
    /// A courier slug together with the carrier's tracking number.
    BySlugAndNumber {
        /// Unique code of the courier (e.g. `dhl`).
        slug: String,
        /// The carrier's tracking number.
        tracking_number: String,
    },
}

impl TrackingIdentifier {
    /// Identifies a tracking by its AfterShip ID.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::ById(id.into())
    }

    /// Identifies a tracking by courier slug and tracking number.
    #[must_use]
    pub fn by_slug_and_number(slug: impl Into<String>, tracking_number: impl Into<String>) -> Self {
        Self::BySlugAndNumber {
            slug: slug.into(),
            tracking_number: tracking_number.into(),
        }
    }

    /// Returns the URL path fragment for this tracking, with each segment
    /// percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`MissingIdentifierError`] if a required field is empty.
    pub fn uri_path(&self) -> Result<String, MissingIdentifierError> {
        match self {
            Self::ById(id) => {
                if id.is_empty() {
                    return Err(MissingIdentifierError::TrackingId);
                }
                Ok(format!("/{}", urlencoding::encode(id)))
            }
            Self::BySlugAndNumber {
                slug,
                tracking_number,
            } => {
                if slug.is_empty() || tracking_number.is_empty() {
                    return Err(MissingIdentifierError::SlugOrTrackingNumber);
                }
                Ok(format!(
                    "/{}/{}",
                    urlencoding::encode(slug),
                    urlencoding::encode(tracking_number)
                ))
            }
        }
    }
}

impl fmt::Display for TrackingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "{id}"),
            Self::BySlugAndNumber {
                slug,
                tracking_number,
            } => write!(f, "{slug}/{tracking_number}"),
        }
    }
}
