//! Notification recipients of a tracking.
//!
//! Only customer recipients are returned; emails, SMS numbers, and webhooks
//! configured for the store are not.
//!
//! # Example
//!
//! ```rust,ignore
//! use aftership_api::rest::resources::Notification;
//!
//! let recipients = Notification {
//!     emails: Some(vec!["customer@example.com".to_string()]),
//!     ..Default::default()
//! };
//! let updated = Notification::add(&client, &ctx, &id, &recipients).await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::clients::{HttpError, RequestContext, RestClient};
use crate::rest::{get_path, Envelope, ResourceOperation, ResourceResponse, TrackingIdentifier};

/// Envelope key for notification payloads.
pub const NOTIFICATION_KEY: &str = "notification";

/// Who is notified when a tracking changes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Notification {
    /// Email addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    /// Phone numbers, with `+` and area code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smses: Option<Vec<String>>,
}

impl Notification {
    /// Fetches the notification recipients of a tracking.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn find(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        client
            .execute(
                ctx,
                get_path(ResourceOperation::FindNotification),
                Some(identifier),
                None,
                None,
            )
            .await
    }

    /// Adds recipients to a tracking, returning the full recipient list.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn add(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
        recipients: &Self,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        Self::send(
            client,
            ctx,
            ResourceOperation::AddNotification,
            identifier,
            recipients,
        )
        .await
    }

    /// Removes recipients from a tracking, returning the remaining list.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn remove(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
        recipients: &Self,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        Self::send(
            client,
            ctx,
            ResourceOperation::RemoveNotification,
            identifier,
            recipients,
        )
        .await
    }

    async fn send(
        client: &RestClient,
        ctx: &RequestContext,
        operation: ResourceOperation,
        identifier: &TrackingIdentifier,
        recipients: &Self,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        let body = Envelope::new(NOTIFICATION_KEY, recipients).to_value()?;
        client
            .execute(
                ctx,
                get_path(operation),
                Some(identifier),
                None,
                Some(body),
            )
            .await
    }
}
