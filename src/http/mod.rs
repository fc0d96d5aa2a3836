//! HTTP layer: transport seam, refresh gate, and the API client.

pub mod client;
pub mod refresh;
pub mod transport;

pub use client::ApiClient;
pub use refresh::RefreshGate;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
