//! vapi-sync Client
//!
//! The migration engine talks to the upstream API through a single
//! capability, [`ApiClient::send`]: one method, one path, one bearer key,
//! an optional JSON body, a JSON response. [`HttpClient`] implements it
//! with reqwest; tests substitute an in-memory fake.
//!
//! # Example
//!
//! ```rust,no_run
//! use vapi_sync_client::{ApiClient, ApiRequest, ClientConfig, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(ClientConfig::new("https://api.vapi.ai"))?;
//! let tool = client.send(ApiRequest::get("/tool/T1", "source-key")).await?;
//! println!("{}", tool["id"]);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod http;
mod request;

pub use error::TransportError;
pub use http::{ClientConfig, HttpClient, DEFAULT_BASE_URL};
pub use request::{ApiClient, ApiRequest, Method};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
