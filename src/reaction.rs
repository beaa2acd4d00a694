//! Reaction publishing.
//!
//! Builds an unsigned reaction event for a target URL, hands it to the
//! signer, and broadcasts the result. Delivery is at-least-one: the publish
//! resolves as soon as any relay accepts, ignoring slower or failing relays.

use crate::config::REACTION_EVENT_KIND;
use crate::error::Result;
use crate::event::{Event, EventTemplate, unix_now_secs};
use crate::pool::{EventPool, first_acceptance};
use crate::signer::Signer;
use tracing::{debug, warn};

/// How the reaction addresses its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetScheme {
    /// A single `r` tag carrying the target URL.
    #[default]
    UrlReference,
    /// A `k` content-kind marker plus an `i` identifier tag, the external
    /// content id form.
    ExternalId,
}

/// A reaction to a web resource: an emoji literal or a `:shortcode:`,
/// optionally paired with a custom emoji image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub target_url: String,
    pub content: String,
    pub emoji_url: Option<String>,
    pub scheme: TargetScheme,
}

impl Reaction {
    pub fn new(target_url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            content: content.into(),
            emoji_url: None,
            scheme: TargetScheme::default(),
        }
    }

    /// Attach a custom emoji image so receivers can render the shortcode
    /// without an extra lookup.
    pub fn with_custom_emoji(mut self, emoji_url: impl Into<String>) -> Self {
        self.emoji_url = Some(emoji_url.into());
        self
    }

    pub fn with_scheme(mut self, scheme: TargetScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Tag set identifying the target, plus the custom emoji mapping when an
    /// image URL is present.
    pub fn to_tags(&self) -> Vec<Vec<String>> {
        let mut tags = match self.scheme {
            TargetScheme::UrlReference => {
                vec![vec!["r".to_string(), self.target_url.clone()]]
            }
            TargetScheme::ExternalId => vec![
                vec!["k".to_string(), "web".to_string()],
                vec!["i".to_string(), self.target_url.clone()],
            ],
        };
        if let Some(emoji_url) = &self.emoji_url {
            tags.push(vec![
                "emoji".to_string(),
                self.content.replace(':', ""),
                emoji_url.clone(),
            ]);
        }
        tags
    }

    /// Unsigned reaction event, timestamped now.
    pub fn to_event_template(&self) -> EventTemplate {
        EventTemplate {
            kind: REACTION_EVENT_KIND,
            tags: self.to_tags(),
            content: self.content.clone(),
            created_at: unix_now_secs().unwrap_or(0),
        }
    }
}

/// Sign and broadcast a reaction to `relays`.
///
/// With no signer available this is a silent no-op: a warning is logged and
/// `Ok(None)` is returned, so a missing browser extension never surfaces as
/// an error in the calling UI. A present signer may still reject (the user
/// declines), which propagates.
///
/// On success the signed event is returned, resolving as soon as the first
/// relay accepts it; the publish fails only if every relay rejects.
pub async fn send_reaction(
    pool: &dyn EventPool,
    signer: Option<&dyn Signer>,
    relays: &[String],
    reaction: &Reaction,
) -> Result<Option<Event>> {
    let Some(signer) = signer else {
        warn!("no signer available, skipping reaction publish");
        return Ok(None);
    };

    let event = signer.sign_event(reaction.to_event_template()).await?;
    let message = first_acceptance(pool.publish(relays, &event)).await?;
    debug!(%message, "reaction accepted");
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::pool::{Filter, PublishFuture, SubscriptionHandle, SubscriptionHooks};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn string_tags(tags: &[&[&str]]) -> Vec<Vec<String>> {
        tags.iter()
            .map(|tag| tag.iter().map(|field| (*field).to_string()).collect())
            .collect()
    }

    #[test]
    fn simple_form_builds_reference_tag() {
        let reaction = Reaction::new("https://example.com", "🎉");
        assert_eq!(reaction.to_tags(), string_tags(&[&["r", "https://example.com"]]));

        let template = reaction.to_event_template();
        assert_eq!(template.kind, REACTION_EVENT_KIND);
        assert_eq!(template.content, "🎉");
        assert!(template.created_at > 0);
    }

    #[test]
    fn extended_form_builds_kind_marker_and_emoji_mapping() {
        let reaction = Reaction::new("https://example.com", ":smile:")
            .with_scheme(TargetScheme::ExternalId)
            .with_custom_emoji("https://cdn/e.png");
        assert_eq!(
            reaction.to_tags(),
            string_tags(&[
                &["k", "web"],
                &["i", "https://example.com"],
                &["emoji", "smile", "https://cdn/e.png"],
            ])
        );
    }

    #[test]
    fn simple_form_also_carries_emoji_mapping() {
        let reaction =
            Reaction::new("https://example.com", ":wave:").with_custom_emoji("https://cdn/w.png");
        assert_eq!(
            reaction.to_tags(),
            string_tags(&[
                &["r", "https://example.com"],
                &["emoji", "wave", "https://cdn/w.png"],
            ])
        );
    }

    struct NoopHandle;

    impl SubscriptionHandle for NoopHandle {
        fn close(self: Box<Self>) {}
    }

    /// Pool that records publish calls and replays scripted per-relay
    /// outcomes.
    struct RecordingPool {
        outcomes: Mutex<Vec<std::result::Result<String, String>>>,
        publish_calls: AtomicUsize,
    }

    impl RecordingPool {
        fn new(outcomes: Vec<std::result::Result<String, String>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                publish_calls: AtomicUsize::new(0),
            }
        }
    }

    impl EventPool for RecordingPool {
        fn subscribe_many(
            &self,
            _relays: &[String],
            _filters: &[Filter],
            _hooks: SubscriptionHooks,
        ) -> Box<dyn SubscriptionHandle> {
            Box::new(NoopHandle)
        }

        fn publish(&self, _relays: &[String], _event: &Event) -> Vec<PublishFuture> {
            self.publish_calls.fetch_add(1, Ordering::SeqCst);
            let outcomes = match self.outcomes.lock() {
                Ok(mut outcomes) => std::mem::take(&mut *outcomes),
                Err(_) => Vec::new(),
            };
            outcomes
                .into_iter()
                .map(|outcome| -> PublishFuture {
                    Box::pin(async move {
                        outcome.map_err(ClientError::PublishRejected)
                    })
                })
                .collect()
        }
    }

    struct StubSigner {
        decline: bool,
    }

    #[async_trait]
    impl Signer for StubSigner {
        async fn sign_event(&self, template: EventTemplate) -> Result<Event> {
            if self.decline {
                return Err(ClientError::Signer("user declined".to_string()));
            }
            Ok(Event {
                id: "event-id".to_string(),
                pubkey: "pubkey".to_string(),
                created_at: template.created_at,
                kind: template.kind,
                tags: template.tags,
                content: template.content,
                sig: "sig".to_string(),
            })
        }
    }

    fn relays() -> Vec<String> {
        vec![
            "wss://relay-a.example/".to_string(),
            "wss://relay-b.example/".to_string(),
        ]
    }

    #[tokio::test]
    async fn missing_signer_skips_publish_without_error() -> Result<()> {
        let pool = RecordingPool::new(vec![Ok("stored".to_string())]);
        let published = send_reaction(
            &pool,
            None,
            &relays(),
            &Reaction::new("https://example.com", "🎉"),
        )
        .await?;
        assert!(published.is_none());
        assert_eq!(pool.publish_calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn signer_rejection_propagates() {
        let pool = RecordingPool::new(vec![Ok("stored".to_string())]);
        let signer = StubSigner { decline: true };
        let outcome = send_reaction(
            &pool,
            Some(&signer),
            &relays(),
            &Reaction::new("https://example.com", "🎉"),
        )
        .await;
        assert!(matches!(outcome, Err(ClientError::Signer(_))));
        assert_eq!(pool.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolves_when_one_relay_accepts() -> Result<()> {
        let pool = RecordingPool::new(vec![
            Err("blocked".to_string()),
            Ok("stored".to_string()),
        ]);
        let signer = StubSigner { decline: false };
        let reaction = Reaction::new("https://example.com", ":smile:")
            .with_custom_emoji("https://cdn/e.png");
        let published = send_reaction(&pool, Some(&signer), &relays(), &reaction).await?;

        let event = published.ok_or_else(|| ClientError::Signer("missing event".to_string()))?;
        assert_eq!(event.kind, REACTION_EVENT_KIND);
        assert_eq!(event.content, ":smile:");
        assert_eq!(event.tag_value("emoji"), Some("smile"));
        assert_eq!(pool.publish_calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_when_all_relays_reject() {
        let pool = RecordingPool::new(vec![
            Err("blocked".to_string()),
            Err("rate-limited".to_string()),
        ]);
        let signer = StubSigner { decline: false };
        let outcome = send_reaction(
            &pool,
            Some(&signer),
            &relays(),
            &Reaction::new("https://example.com", "🎉"),
        )
        .await;
        assert!(matches!(outcome, Err(ClientError::PublishRejected(_))));
    }
}
