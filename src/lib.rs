//! NDIS admin client core — session, HTTP interceptor, typed API surface,
//! and the onboarding coordinator.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod onboarding;
pub mod session;
