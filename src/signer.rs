//! Event signing seam.

use crate::error::Result;
use crate::event::{Event, EventTemplate};
use async_trait::async_trait;

/// A signing capability, typically provided by a browser extension or a
/// key-holding agent. May be absent at a call site (`Option<&dyn Signer>`)
/// and may reject, e.g. when the user declines.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Compute the event id and signature for `template`, returning the
    /// finished event.
    async fn sign_event(&self, template: EventTemplate) -> Result<Event>;
}
