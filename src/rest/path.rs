//! Operation table for the tracking endpoints.
//!
//! Every API action is described by a [`ResourcePath`]: its HTTP method, a
//! path template, and the key its response payload sits under. Templates
//! containing `{identifier}` require a [`TrackingIdentifier`].
//!
//! # Example
//!
//! ```rust
//! use aftership_api::rest::{get_path, ResourceOperation, TrackingIdentifier};
//!
//! let path = get_path(ResourceOperation::Retrack);
//! let id = TrackingIdentifier::by_slug_and_number("dhl", "RA123");
//! assert_eq!(path.build(Some(&id)).unwrap(), "/trackings/dhl/RA123/retrack");
//! ```

use crate::clients::{HttpMethod, MissingIdentifierError};
use crate::rest::TrackingIdentifier;

const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// Actions supported by the tracking endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Create a tracking (POST /trackings).
    Create,
    /// List trackings (GET /trackings).
    All,
    /// Fetch one tracking (GET /trackings/{identifier}).
    Find,
    /// Update a tracking (PUT /trackings/{identifier}).
    Update,
    /// Delete a tracking (DELETE /trackings/{identifier}).
    Delete,
    /// Restart tracking of an expired shipment.
    Retrack,
    /// Stop tracking with a completion reason.
    MarkAsCompleted,
    /// Fetch notification recipients.
    FindNotification,
    /// Add notification recipients.
    AddNotification,
    /// Remove notification recipients.
    RemoveNotification,
}

impl ResourceOperation {
    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::All => "all",
            Self::Find => "find",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Retrack => "retrack",
            Self::MarkAsCompleted => "mark_as_completed",
            Self::FindNotification => "find_notification",
            Self::AddNotification => "add_notification",
            Self::RemoveNotification => "remove_notification",
        }
    }
}

/// How to reach one API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    /// The HTTP method for this path.
    pub http_method: HttpMethod,
    /// The operation this path is used for.
    pub operation: ResourceOperation,
    /// The path template, relative to the endpoint.
    pub template: &'static str,
    /// The key the response payload is wrapped under, if any.
    pub response_key: Option<&'static str>,
}

impl ResourcePath {
    /// Creates a new `ResourcePath`.
    #[must_use]
    pub const fn new(
        http_method: HttpMethod,
        operation: ResourceOperation,
        template: &'static str,
        response_key: Option<&'static str>,
    ) -> Self {
        Self {
            http_method,
            operation,
            template,
            response_key,
        }
    }

    /// Returns whether the template needs a tracking identifier.
    #[must_use]
    pub fn requires_identifier(&self) -> bool {
        self.template.contains(IDENTIFIER_PLACEHOLDER)
    }

    /// Builds the request path, substituting the identifier when required.
    ///
    /// # Errors
    ///
    /// Returns [`MissingIdentifierError`] if the template needs an identifier
    /// and none was given, or the identifier has an empty field.
    pub fn build(
        &self,
        identifier: Option<&TrackingIdentifier>,
    ) -> Result<String, MissingIdentifierError> {
        if !self.requires_identifier() {
            return Ok(self.template.to_string());
        }

        let identifier = identifier.ok_or(MissingIdentifierError::TrackingId)?;
        let uri_path = identifier.uri_path()?;
        // uri_path already carries its leading slash
        Ok(self
            .template
            .replace(&format!("/{IDENTIFIER_PLACEHOLDER}"), &uri_path))
    }
}

/// The tracking endpoints, one per [`ResourceOperation`].
pub const TRACKING_PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Create,
        "/trackings",
        Some("tracking"),
    ),
    ResourcePath::new(HttpMethod::Get, ResourceOperation::All, "/trackings", None),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Find,
        "/trackings/{identifier}",
        Some("tracking"),
    ),
    ResourcePath::new(
        HttpMethod::Put,
        ResourceOperation::Update,
        "/trackings/{identifier}",
        Some("tracking"),
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::Delete,
        "/trackings/{identifier}",
        Some("tracking"),
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Retrack,
        "/trackings/{identifier}/retrack",
        Some("tracking"),
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::MarkAsCompleted,
        "/trackings/{identifier}/mark-as-completed",
        Some("tracking"),
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::FindNotification,
        "/trackings/{identifier}/notifications",
        Some("notification"),
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::AddNotification,
        "/trackings/{identifier}/notifications/add",
        Some("notification"),
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::RemoveNotification,
        "/trackings/{identifier}/notifications/remove",
        Some("notification"),
    ),
];

/// Looks up the path for an operation.
///
/// `TRACKING_PATHS` is laid out in `ResourceOperation` declaration order.
#[must_use]
pub const fn get_path(operation: ResourceOperation) -> &'static ResourcePath {
    &TRACKING_PATHS[operation as usize]
}
