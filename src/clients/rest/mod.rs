//! Typed REST client for the AfterShip Tracking API.
//!
//! [`RestClient`] sits on top of the [`HttpClient`](crate::clients::HttpClient):
//! it resolves operation paths, sends them, and unwraps the
//! `{"meta": ..., "data": ...}` response envelope into typed payloads.
//!
//! Resource types in [`crate::rest::resources`] call into it; most callers
//! never use [`RestClient::execute`] directly.

mod client;

pub use client::RestClient;
