//! Client configuration constants and profile helpers.

use crate::error::{ClientError, Result};
use bech32::{Bech32, Hrp};

/// Event kind for reactions to web resources.
pub const REACTION_EVENT_KIND: u16 = 17;

/// Relays reactions are read from and written to by default.
pub const DEFAULT_RELAYS: &[&str] = &["wss://relay.mymt.casa/"];

/// Relays queried for profile metadata.
pub const PROFILE_RELAYS: &[&str] = &["wss://purplepag.es/", "wss://directory.yabu.me/"];

/// Encode a hex public key as a bech32 `npub`.
pub fn npub_encode(pubkey_hex: &str) -> Result<String> {
    let bytes = hex::decode(pubkey_hex).map_err(|error| ClientError::InvalidKey(error.to_string()))?;
    let hrp = Hrp::parse("npub").map_err(|error| ClientError::InvalidKey(error.to_string()))?;
    bech32::encode::<Bech32>(hrp, &bytes).map_err(|error| ClientError::InvalidKey(error.to_string()))
}

/// Deterministic avatar URL for a public key, for reactors without profile
/// pictures.
pub fn robohash_url(pubkey_hex: &str) -> Result<String> {
    let npub = npub_encode(pubkey_hex)?;
    Ok(format!("https://robohash.org/{npub}?set=set4"))
}
