//! `OllamaKit` Kernel - request plumbing shared by every API route
//!
//! # Architecture
//!
//! ## Signing
//! - `Signer`: pluggable digest over a canonical string
//! - `Sha1Signer`: unkeyed SHA-1, the scheme the server validates
//! - `RequestSigner`: draws the nonce and timestamp and produces a `SignatureStamp`
//!
//! ## Request building
//! - `Endpoint`: path, method, default headers and body of one operation
//! - `RequestBuilder`: base address + endpoint + header overrides -> `OutboundRequest`
//!
//! ## Transport
//! - `Transport`: "send and get raw bytes" / "send and decode as `T`"
//! - `ReqwestTransport`: reqwest-backed implementation
//!
//! # Example
//! ```rust,no_run
//! use ollamakit::api::Route;
//! use ollamakit::core::kernel::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(TransportConfig::new())?;
//! let request = RequestBuilder::new("http://localhost:11434").build(&Route::Models)?;
//! let raw = transport.send(request).await?;
//! println!("{} bytes", raw.len());
//! # Ok(())
//! # }
//! ```
pub mod request;
pub mod rest;
pub mod signer;

pub use request::{Endpoint, OutboundRequest, RequestBuilder};
pub use rest::{ReqwestTransport, Transport, TransportConfig};
pub use signer::{RequestSigner, Sha1Signer, SignatureStamp, Signer};
