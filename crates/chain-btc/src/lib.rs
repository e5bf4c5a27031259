//! Bitcoin-family address encoding.
//!
//! Native SegWit (P2WPKH, bech32) addresses for Bitcoin and its testnet, and
//! legacy P2PKH addresses for any Bitcoin-derived coin given its address
//! version byte (Litecoin, Dogecoin, Dash).

pub mod address;
pub mod error;

pub use address::{pubkey_to_p2pkh_address, pubkey_to_p2wpkh_address};
pub use bitcoin::Network;
pub use error::BtcError;
