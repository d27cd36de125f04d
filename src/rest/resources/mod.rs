//! Typed resources of the AfterShip Tracking API.
//!
//! Each resource exposes its API actions as associated async functions that
//! take the [`RestClient`](crate::clients::RestClient), a
//! [`RequestContext`](crate::clients::RequestContext), and the operation's
//! inputs.

mod notification;
mod tracking;

pub use notification::{Notification, NOTIFICATION_KEY};
pub use tracking::{
    Checkpoint, CreateTrackingParams, EstimatedDeliveryDate, GetTrackingParams,
    GetTrackingsParams, LatestEstimatedDelivery, PagedTrackings, Tracking,
    TrackingCompletedStatus, UpdateTrackingParams, TRACKING_KEY,
};
