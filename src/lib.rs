//! Vidgate - caching gateway for video metadata lookups
//!
//! This crate sits in front of an external video-metadata provider and
//! resolves video identifiers to normalized, schema-complete records.
//! Lookups within the configured TTL window are served from an in-process
//! cache instead of hitting the upstream again.
//!
//! # Example
//!
//! ```rust,no_run
//! use vidgate::Vidgate;
//!
//! #[tokio::main]
//! async fn main() -> vidgate::Result<()> {
//!     let gateway = Vidgate::builder().build();
//!
//!     let lookup = gateway.get_video("dQw4w9WgXcQ").await?;
//!     println!("{}", lookup.record.views);
//!     Ok(())
//! }
//! ```
//!
//! The HTTP surface lives in [`server`]; the `vidgated` binary wires it to
//! the real Innertube upstream.

pub mod cache;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod provider;
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{Result, VidgateError};
pub use gateway::{Lookup, LookupSource, Vidgate, VidgateBuilder, VideoGateway};
pub use normalize::{CountFormatter, Locale, Normalizer};
pub use types::{AuthorInfo, Description, NormalizedRecord, RawVideoInfo, RelatedItem};
