//! Client Layer - the two HTTP collaborators of the control loop
//!
//! This module provides:
//! - StatusSource / ReplicaSink traits for abstraction over the endpoints
//! - HttpAppClient, the reqwest implementation of both

pub mod http;
pub mod traits;

pub use http::{HttpAppClient, HttpClientConfig};
pub use traits::{ReplicaSink, StatusSource};
