//! Client-side Nostr reaction utilities.
//!
//! This crate intentionally exposes a small surface:
//! - fetching stored events from relays through an external pool
//! - building, signing, and publishing reaction events
//!
//! Relay transport, wire framing, and key cryptography are not implemented
//! here; they sit behind the [`EventPool`] and [`Signer`] traits.

pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod pool;
pub mod reaction;
pub mod signer;

pub use config::{DEFAULT_RELAYS, PROFILE_RELAYS, REACTION_EVENT_KIND};
pub use error::{ClientError, Result};
pub use event::{Event, EventTemplate};
pub use fetch::{EventCallback, FetchStrategy, fetch_events};
pub use pool::{EventPool, Filter, PublishFuture, SubscriptionHandle, SubscriptionHooks};
pub use reaction::{Reaction, TargetScheme, send_reaction};
pub use signer::Signer;
