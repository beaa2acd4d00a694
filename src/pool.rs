//! The relay pool seam.
//!
//! Connection management, wire framing, and relay I/O all live in an external
//! pool implementation; this crate only sequences calls against it. The pool
//! surface is the minimal one the fetch and reaction operations need.

use crate::error::{ClientError, Result};
use crate::event::Event;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::future::Future;
use std::pin::Pin;

/// A relay query filter. Opaque to this layer; relays interpret it.
pub type Filter = serde_json::Value;

/// One pending publish, one per relay. Resolves to the relay's acceptance
/// message, or an error if the relay rejected the event.
pub type PublishFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

/// Callbacks a subscription delivers into.
///
/// `on_event` fires once per matching event as it arrives; `on_eose` fires
/// when the relay signals end-of-stored-events for the subscription.
pub struct SubscriptionHooks {
    pub on_event: Box<dyn Fn(Event) + Send + Sync>,
    pub on_eose: Box<dyn Fn() + Send + Sync>,
}

/// Handle to an open subscription. Closing it is the only operation.
pub trait SubscriptionHandle: Send {
    fn close(self: Box<Self>);
}

/// External connection pool surface.
///
/// The pool owns its relay connections; they persist across calls and are
/// never torn down by this crate. Subscriptions opened here are closed
/// individually via their handles.
pub trait EventPool: Send + Sync {
    /// Open one subscription over `relays` for the given filters, delivering
    /// into `hooks`.
    fn subscribe_many(
        &self,
        relays: &[String],
        filters: &[Filter],
        hooks: SubscriptionHooks,
    ) -> Box<dyn SubscriptionHandle>;

    /// Broadcast an event, returning one pending publish per relay.
    fn publish(&self, relays: &[String], event: &Event) -> Vec<PublishFuture>;
}

/// Race per-relay publishes, resolving on the first acceptance.
///
/// Rejections are tolerated as long as one relay accepts. Only when every
/// relay rejects does this fail, carrying the collected rejection reasons.
pub async fn first_acceptance(publishes: Vec<PublishFuture>) -> Result<String> {
    let mut pending: FuturesUnordered<PublishFuture> = publishes.into_iter().collect();
    let mut rejections = Vec::new();
    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(message) => return Ok(message),
            Err(error) => rejections.push(error.to_string()),
        }
    }
    if rejections.is_empty() {
        return Err(ClientError::PublishRejected(
            "no relays to publish to".to_string(),
        ));
    }
    Err(ClientError::PublishRejected(rejections.join("; ")))
}
