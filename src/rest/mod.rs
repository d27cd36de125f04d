//! Resource layer for the AfterShip Tracking API.
//!
//! This module turns typed inputs into requests and responses back into
//! typed values:
//!
//! - **[`TrackingIdentifier`]**: addresses one tracking by ID or by slug and number
//! - **[`Envelope`] and [`decode`]**: single-key JSON wrapping and unwrapping
//! - **[`to_query`]**: sparse query-string encoding of parameter structs
//! - **[`ResourcePath`] and [`ResourceOperation`]**: the operation table
//! - **[`ResourceResponse<T>`]**: a Deref-based wrapper carrying rate limit metadata
//! - **[`resources`]**: the `Tracking` and `Notification` resources
//!
//! # Example
//!
//! ```rust,ignore
//! use aftership_api::clients::RequestContext;
//! use aftership_api::rest::resources::{Tracking, TrackingCompletedStatus};
//! use aftership_api::rest::TrackingIdentifier;
//!
//! let ctx = RequestContext::new();
//! let id = TrackingIdentifier::by_id("5b74f4958776db0e00b6f5ed");
//!
//! let tracking = Tracking::find(&client, &ctx, &id, None).await?;
//! println!("{:?} ({} attempts)", tracking.tag, tracking.attempts());
//!
//! Tracking::mark_as_completed(&client, &ctx, &id, TrackingCompletedStatus::Delivered).await?;
//! ```

mod envelope;
mod identifier;
mod path;
mod query;
mod response;

pub mod resources;

pub use envelope::{decode, Envelope, EnvelopeError};
pub use identifier::TrackingIdentifier;
pub use path::{get_path, ResourceOperation, ResourcePath, TRACKING_PATHS};
pub use query::to_query;
pub use response::ResourceResponse;
