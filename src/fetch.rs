//! Relay event fetching.
//!
//! Opens subscriptions over an external pool, accumulates events until the
//! relays signal end-of-stored-events, then closes the subscriptions and
//! returns the accumulated list.

use crate::event::Event;
use crate::pool::{EventPool, Filter, SubscriptionHandle, SubscriptionHooks};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Per-event callback invoked as events arrive, before they are appended to
/// the result list. Enables incremental rendering during a fetch.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// How a fetch maps filters onto subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// One subscription carrying every filter; the fetch completes on the
    /// first end-of-stored-events signal.
    Combined,
    /// One subscription per filter; the fetch completes once every
    /// subscription has signalled end-of-stored-events. Lets relays that
    /// only accept single-filter queries serve multi-criteria fetches, at
    /// the cost of waiting for the slowest filter's stream.
    #[default]
    PerFilter,
}

enum FetchMessage {
    Event(Event),
    Eose,
}

fn subscription_hooks(
    tx: mpsc::UnboundedSender<FetchMessage>,
    callback: Option<EventCallback>,
) -> SubscriptionHooks {
    let event_tx = tx.clone();
    SubscriptionHooks {
        on_event: Box::new(move |event| {
            if let Some(callback) = &callback {
                callback(&event);
            }
            let _ = event_tx.send(FetchMessage::Event(event));
        }),
        on_eose: Box::new(move || {
            let _ = tx.send(FetchMessage::Eose);
        }),
    }
}

/// Fetch all stored events matching `filters` from `relays`.
///
/// Events are returned in arrival order and are not deduplicated: the same
/// event reaching us through two filters or two relays appears twice.
///
/// No timeout is imposed here. A relay that never signals
/// end-of-stored-events leaves this future pending, and so does an empty
/// filter list under [`FetchStrategy::PerFilter`] (no subscriptions are
/// opened, so the completion counter is never advanced). Callers that cannot
/// rule either out should wrap the call in a timeout.
pub async fn fetch_events(
    pool: &dyn EventPool,
    relays: &[String],
    filters: &[Filter],
    strategy: FetchStrategy,
    on_event: Option<EventCallback>,
) -> Vec<Event> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handles: Vec<Box<dyn SubscriptionHandle>> = Vec::new();

    let eose_target = match strategy {
        FetchStrategy::Combined => {
            handles.push(pool.subscribe_many(
                relays,
                filters,
                subscription_hooks(tx.clone(), on_event.clone()),
            ));
            1
        }
        FetchStrategy::PerFilter => {
            for filter in filters {
                handles.push(pool.subscribe_many(
                    relays,
                    std::slice::from_ref(filter),
                    subscription_hooks(tx.clone(), on_event.clone()),
                ));
            }
            filters.len()
        }
    };

    // `tx` stays in scope for the whole wait, so the channel only yields what
    // the hooks deliver and the loop exits solely through the counter.
    let mut events = Vec::new();
    let mut eose_seen = 0usize;
    while let Some(message) = rx.recv().await {
        match message {
            FetchMessage::Event(event) => events.push(event),
            FetchMessage::Eose => {
                eose_seen += 1;
                if eose_seen >= eose_target {
                    break;
                }
            }
        }
    }

    for handle in handles {
        handle.close();
    }
    debug!(count = events.len(), "fetch complete");
    events
}
