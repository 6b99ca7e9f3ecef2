//! BACnet tag envelopes in pure Rust.
//!
//! `bactag-core` decodes and encodes the tagged values that make up BACnet
//! application data: a bit-packed header (tag number, class, length) followed
//! by exactly one payload variant selected from that header. The binary codec
//! is `no_std`-compatible and only needs `alloc`.
//!
//! # Feature flags
//!
//! - **`std`** (default) — enables `std::error::Error` implementations.
//! - **`text`** (default) — XML mirror of envelopes via `roxmltree`; implies `std`.
//! - **`serde`** — derives `Serialize`/`Deserialize` on headers and payloads.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Bit-level reader/writer and fixed-width integer helpers.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// Tag header, variant registry and the envelope.
pub mod tag;
/// XML representation of envelopes and payloads.
#[cfg(feature = "text")]
pub mod text;
/// Payload variants and the contract they implement.
pub mod variants;

pub use error::{DecodeError, EncodeError, FieldContext, ParseError, SerializeError};
pub use tag::{Envelope, TagHeader, TagKind};
pub use variants::{Payload, TagBody};
