//! Parking lot data sources for Parkrace.
//!
//! Parkrace doesn't own any parking data. Lots come from somewhere else:
//! usually the public data portal's parking-facility dataset, sometimes a
//! fixed list (tests, offline demos).
//!
//! This crate defines the [`LotSource`] trait, a single async method that
//! returns one page of lots, and ships two implementations:
//!
//! - [`HttpLotSource`]: queries the public data portal over HTTP
//! - [`StaticLotSource`]: serves a fixed in-memory list
//!
//! Sources always report failures as a typed [`SourceError`]. Whether a
//! failure is surfaced or degraded to "no lots" is the caller's policy.

mod config;
mod error;
mod http;
mod record;
mod source;

pub use config::SourceConfig;
pub use error::SourceError;
pub use http::HttpLotSource;
pub use record::decode_lots;
pub use source::{LotSource, StaticLotSource};
