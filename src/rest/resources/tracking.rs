//! Tracking resource implementation.
//!
//! This module provides the [`Tracking`] resource and its request
//! parameter types. A tracking is addressed either by its AfterShip ID or by
//! courier slug and tracking number; see [`TrackingIdentifier`].
//!
//! # Resource-Specific Operations
//!
//! In addition to create, find, list, update and delete, the Tracking
//! resource provides:
//! - [`Tracking::retrack`] - Restart tracking of an expired shipment
//! - [`Tracking::mark_as_completed`] - Stop tracking with a reason
//!
//! # Example
//!
//! ```rust,ignore
//! use aftership_api::clients::RequestContext;
//! use aftership_api::rest::resources::{CreateTrackingParams, GetTrackingsParams, Tracking};
//! use aftership_api::rest::TrackingIdentifier;
//!
//! let ctx = RequestContext::new();
//!
//! let created = Tracking::create(&client, &ctx, &CreateTrackingParams {
//!     tracking_number: "RA123456789CN".to_string(),
//!     slug: Some("china-post".to_string()),
//!     ..Default::default()
//! }).await?;
//!
//! let page = Tracking::all(&client, &ctx, Some(&GetTrackingsParams {
//!     page: Some(2),
//!     ..Default::default()
//! })).await?;
//! println!("{} trackings on page {}", page.trackings.len(), page.page);
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{HttpError, MissingIdentifierError, RequestContext, RestClient};
use crate::rest::{
    get_path, to_query, Envelope, ResourceOperation, ResourceResponse, TrackingIdentifier,
};

/// Envelope key for tracking payloads.
pub const TRACKING_KEY: &str = "tracking";

/// Reason for marking a tracking as completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingCompletedStatus {
    /// The shipment was delivered.
    Delivered,
    /// The shipment was lost.
    Lost,
    /// The shipment was returned to the sender.
    ReturnedToSender,
}

impl TrackingCompletedStatus {
    /// Returns the wire value of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "DELIVERED",
            Self::Lost => "LOST",
            Self::ReturnedToSender => "RETURNED_TO_SENDER",
        }
    }
}

impl fmt::Display for TrackingCompletedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checkpoint in a tracking's history.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Checkpoint {
    /// Unique code of the courier that reported the checkpoint.
    pub slug: Option<String>,
    /// When AfterShip recorded the checkpoint.
    pub created_at: Option<DateTime<Utc>>,
    /// Local time of the checkpoint as reported by the courier.
    pub checkpoint_time: Option<String>,
    /// City of the checkpoint.
    pub city: Option<String>,
    /// Latitude and longitude, if provided.
    pub coordinates: Option<Vec<String>>,
    /// Country of the checkpoint, ISO Alpha-3.
    pub country_iso3: Option<String>,
    /// Country name of the checkpoint.
    pub country_name: Option<String>,
    /// Checkpoint message.
    pub message: Option<String>,
    /// State of the checkpoint.
    pub state: Option<String>,
    /// Location as reported by the courier.
    pub location: Option<String>,
    /// Normalized status of the checkpoint.
    pub tag: Option<String>,
    /// Normalized sub-status of the checkpoint.
    pub subtag: Option<String>,
    /// Human-readable sub-status.
    pub subtag_message: Option<String>,
    /// Postal code of the checkpoint.
    pub zip: Option<String>,
    /// Status as reported by the courier.
    pub raw_tag: Option<String>,
}

/// AfterShip's own delivery estimate.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EstimatedDeliveryDate {
    /// The estimated arrival date.
    pub estimated_delivery_date: Option<String>,
    /// Reliability of the estimate, from 0.0 to 1.0.
    pub confidence_score: Option<f64>,
    /// Earliest estimated arrival date.
    pub estimated_delivery_date_min: Option<String>,
    /// Latest estimated arrival date.
    pub estimated_delivery_date_max: Option<String>,
}

/// The latest estimated delivery, from the carrier, AfterShip, or custom rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LatestEstimatedDelivery {
    /// Whether the estimate is a single date or a range.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Where the estimate came from.
    pub source: Option<String>,
    /// The estimated date and time.
    pub datetime: Option<String>,
    /// Lower end of a range estimate.
    pub datetime_min: Option<String>,
    /// Upper end of a range estimate.
    pub datetime_max: Option<String>,
}

/// A shipment tracked by AfterShip.
///
/// All fields are optional: list calls may return a subset selected with
/// `fields`, and the API omits values it does not know.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Tracking {
    /// Unique identifier generated by AfterShip.
    pub id: Option<String>,
    /// When the tracking was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the tracking was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// When tracking information was last refreshed.
    pub last_updated_at: Option<DateTime<Utc>>,
    /// Tracking number of the shipment.
    pub tracking_number: Option<String>,
    /// Unique code of the courier.
    pub slug: Option<String>,
    /// Whether AfterShip is still tracking the shipment.
    pub active: Option<bool>,
    /// Google cloud message registration IDs for push notifications.
    pub android: Option<Vec<String>>,
    /// Custom fields.
    pub custom_fields: Option<HashMap<String, serde_json::Value>>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Total delivery time in days.
    pub delivery_time: Option<i64>,
    /// Destination country, ISO Alpha-3.
    pub destination_country_iso3: Option<String>,
    /// Shipping address the shipment is going to.
    pub destination_raw_location: Option<String>,
    /// Destination country detected from the courier, ISO Alpha-3.
    pub courier_destination_country_iso3: Option<String>,
    /// Email addresses to notify.
    pub emails: Option<Vec<String>>,
    /// Expected delivery date.
    pub expected_delivery: Option<String>,
    /// Apple iOS device IDs for push notifications.
    pub ios: Option<Vec<String>>,
    /// Free-text note.
    pub note: Option<String>,
    /// Order ID.
    pub order_id: Option<String>,
    /// Order URL path.
    pub order_id_path: Option<String>,
    /// When the order was created.
    pub order_date: Option<String>,
    /// Origin country, ISO Alpha-3.
    pub origin_country_iso3: Option<String>,
    /// Number of packages in the shipment.
    pub shipment_package_count: Option<i64>,
    /// When the shipment was picked up.
    pub shipment_pickup_date: Option<String>,
    /// When the shipment was delivered.
    pub shipment_delivery_date: Option<String>,
    /// Shipment type reported by the carrier.
    pub shipment_type: Option<String>,
    /// Shipment weight reported by the carrier.
    pub shipment_weight: Option<f64>,
    /// Unit of `shipment_weight` (`kg` or `lb`).
    pub shipment_weight_unit: Option<String>,
    /// Who signed for the delivery.
    pub signed_by: Option<String>,
    /// Phone numbers to notify.
    pub smses: Option<Vec<String>>,
    /// How the tracking was added.
    pub source: Option<String>,
    /// Current normalized status (e.g. `InTransit`, `Delivered`).
    pub tag: Option<String>,
    /// Current normalized sub-status.
    pub subtag: Option<String>,
    /// Human-readable sub-status.
    pub subtag_message: Option<String>,
    /// Title of the tracking.
    pub title: Option<String>,
    /// Number of attempts AfterShip made at the courier.
    pub tracked_count: Option<i64>,
    /// Whether the shipment is trackable to its final destination.
    pub last_mile_tracking_supported: Option<bool>,
    /// Store, customer, or order language.
    pub language: Option<String>,
    /// Token for the public tracking page link.
    pub unique_token: Option<String>,
    /// Checkpoint history.
    pub checkpoints: Option<Vec<Checkpoint>>,
    /// Phone numbers subscribed to notifications.
    pub subscribed_smses: Option<Vec<String>>,
    /// Email addresses subscribed to notifications.
    pub subscribed_emails: Option<Vec<String>>,
    /// Whether the shipment is being or was returned to the sender.
    pub return_to_sender: Option<bool>,
    /// Promised delivery date of the order (`YYYY-MM-DD`).
    pub order_promised_delivery_date: Option<String>,
    /// `pickup_at_store`, `pickup_at_courier`, or `door_to_door`.
    pub delivery_type: Option<String>,
    /// Pickup location for the receiver.
    pub pickup_location: Option<String>,
    /// Pickup note for the receiver.
    pub pickup_note: Option<String>,
    /// Courier's own tracking page.
    pub courier_tracking_link: Option<String>,
    /// First delivery attempt by the carrier.
    pub first_attempted_at: Option<String>,
    /// Link for changing delivery instructions, if the carrier supports it.
    pub courier_redirect_link: Option<String>,
    /// Shipper account number, required by some couriers.
    pub tracking_account_number: Option<String>,
    /// Origin country, required by some couriers.
    pub tracking_origin_country: Option<String>,
    /// Destination country, required by some couriers.
    pub tracking_destination_country: Option<String>,
    /// Shipment key, required by some couriers.
    pub tracking_key: Option<String>,
    /// Receiver postal code, required by some couriers.
    pub tracking_postal_code: Option<String>,
    /// Ship date (`YYYYMMDD`), required by some couriers.
    pub tracking_ship_date: Option<String>,
    /// Located state, required by some couriers.
    pub tracking_state: Option<String>,
    /// Whether the shipment was delivered on time.
    pub on_time_status: Option<String>,
    /// Days early or late.
    pub on_time_difference: Option<i64>,
    /// Order tags.
    pub order_tags: Option<Vec<String>>,
    /// AfterShip's delivery estimate.
    #[serde(rename = "aftership_estimated_delivery_date")]
    pub estimated_delivery_date: Option<EstimatedDeliveryDate>,
    /// Order number.
    pub order_number: Option<String>,
    /// The latest delivery estimate from any source.
    pub latest_estimated_delivery: Option<LatestEstimatedDelivery>,
}

/// Parameters for creating a tracking.
///
/// Only `tracking_number` is required; AfterShip detects the courier when
/// `slug` is omitted.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct CreateTrackingParams {
    /// Tracking number of the shipment.
    pub tracking_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_promised_delivery_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_origin_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_destination_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_ship_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_country_iso3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_country_iso3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Courier group to detect within; cannot be combined with `slug`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}

/// Fields that can be changed on an existing tracking.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct UpdateTrackingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_country_iso3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<HashMap<String, String>>,
    /// Carrier shipment type; setting it stops updates from the carrier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_type: Option<String>,
}

/// Query parameters for fetching a single tracking.
///
/// The `tracking_*` fields are extra lookup keys some couriers require when
/// the tracking is addressed by slug and tracking number.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct GetTrackingParams {
    /// Fields to include in the response (e.g. `title`, `order_id`).
    pub fields: Option<Vec<String>>,
    /// Translation language for `china-ems` and `china-post` (e.g. `en`).
    pub lang: Option<String>,
    pub tracking_postal_code: Option<String>,
    pub tracking_ship_date: Option<String>,
    pub tracking_destination_country: Option<String>,
    pub tracking_account_number: Option<String>,
    pub tracking_key: Option<String>,
    pub tracking_origin_country: Option<String>,
    pub tracking_state: Option<String>,
}

/// Query parameters for listing trackings.
///
/// Unset, empty, and zero values are left out of the query string.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct GetTrackingsParams {
    /// Page to show (API default: 1).
    pub page: Option<u32>,
    /// Trackings per page (API default: 100, max: 200).
    pub limit: Option<u32>,
    /// Searches tracking number, title, order ID, customer name, custom fields, emails and smses.
    pub keyword: Option<String>,
    pub tracking_numbers: Option<Vec<String>>,
    pub slug: Option<Vec<String>>,
    /// Total delivery time in days.
    pub delivery_time: Option<u32>,
    /// Origin countries, ISO Alpha-3.
    pub origin: Option<Vec<String>>,
    /// Destination countries, ISO Alpha-3.
    pub destination: Option<Vec<String>>,
    pub tag: Option<String>,
    pub created_at_min: Option<DateTime<Utc>>,
    pub created_at_max: Option<DateTime<Utc>>,
    pub updated_at_min: Option<DateTime<Utc>>,
    pub updated_at_max: Option<DateTime<Utc>>,
    pub fields: Option<Vec<String>>,
    pub lang: Option<String>,
    pub last_updated_at: Option<DateTime<Utc>>,
    /// `true`, `false`, or `true,false`.
    pub return_to_sender: Option<Vec<String>>,
    pub courier_destination_country_iso3: Option<Vec<String>>,
}

/// One page of trackings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PagedTrackings {
    /// Trackings per page.
    pub limit: u32,
    /// Total number of matching trackings (capped at 10,000).
    pub count: u32,
    /// Current page.
    pub page: u32,
    /// The trackings on this page.
    pub trackings: Vec<Tracking>,
}

#[derive(Serialize)]
struct MarkAsCompletedBody {
    reason: TrackingCompletedStatus,
}

impl Tracking {
    /// Creates a tracking.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::MissingIdentifier`] without sending anything if
    /// `tracking_number` is empty, or any other [`HttpError`] from the call.
    pub async fn create(
        client: &RestClient,
        ctx: &RequestContext,
        params: &CreateTrackingParams,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        if params.tracking_number.is_empty() {
            return Err(MissingIdentifierError::TrackingNumber.into());
        }

        let body = Envelope::new(TRACKING_KEY, params).to_value()?;
        client
            .execute(
                ctx,
                get_path(ResourceOperation::Create),
                None,
                None,
                Some(body),
            )
            .await
    }

    /// Fetches a single tracking.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if the tracking doesn't exist, or any
    /// other [`HttpError`] from the call.
    pub async fn find(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
        params: Option<&GetTrackingParams>,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        let query = params.map(to_query).transpose()?;
        client
            .execute(
                ctx,
                get_path(ResourceOperation::Find),
                Some(identifier),
                query,
                None,
            )
            .await
    }

    /// Lists trackings, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails.
    pub async fn all(
        client: &RestClient,
        ctx: &RequestContext,
        params: Option<&GetTrackingsParams>,
    ) -> Result<ResourceResponse<PagedTrackings>, HttpError> {
        let query = params.map(to_query).transpose()?;
        client
            .execute(ctx, get_path(ResourceOperation::All), None, query, None)
            .await
    }

    /// Updates a tracking.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn update(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
        params: &UpdateTrackingParams,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        let body = Envelope::new(TRACKING_KEY, params).to_value()?;
        client
            .execute(
                ctx,
                get_path(ResourceOperation::Update),
                Some(identifier),
                None,
                Some(body),
            )
            .await
    }

    /// Deletes a tracking, returning its last state.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn delete(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        client
            .execute(
                ctx,
                get_path(ResourceOperation::Delete),
                Some(identifier),
                None,
                None,
            )
            .await
    }

    /// Restarts tracking of an expired shipment (at most 3 times per tracking).
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn retrack(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        client
            .execute(
                ctx,
                get_path(ResourceOperation::Retrack),
                Some(identifier),
                None,
                None,
            )
            .await
    }

    /// Marks a tracking as completed; it stops updating until retracked.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the identifier is blank or the call fails.
    pub async fn mark_as_completed(
        client: &RestClient,
        ctx: &RequestContext,
        identifier: &TrackingIdentifier,
        reason: TrackingCompletedStatus,
    ) -> Result<ResourceResponse<Self>, HttpError> {
        // This endpoint takes the reason at the top level, not enveloped
        let body = serde_json::to_value(MarkAsCompletedBody { reason })?;
        client
            .execute(
                ctx,
                get_path(ResourceOperation::MarkAsCompleted),
                Some(identifier),
                None,
                Some(body),
            )
            .await
    }
}
