//! # wallet-utils
//!
//! Leaf utilities shared by every wallet crate: the bounds-checked
//! [`BoundedReader`] used by all wire decoders, scoped secret wrappers that
//! wipe themselves on drop, and the hash compositions used for key
//! fingerprints and address payloads.

pub mod error;
pub mod hash;
pub mod reader;
pub mod zeroizing;

pub use error::ReadError;
pub use reader::BoundedReader;
pub use zeroizing::{PrivateKey, Seed};
