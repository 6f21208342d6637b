//! # Notification Bus
//!
//! Per-editor-instance publish/subscribe channel announcing lifecycle
//! milestones to host code.
//!
//! Dispatch is an ordered table keyed by [`Topic`]: listeners run in
//! priority order (higher first, insertion order within a priority),
//! one-shot subscriptions are dropped after their first delivery, and any
//! subscription can be removed by its [`SubscriptionId`]. There is no
//! cross-instance state.
//!
//! Listeners double as lifecycle hooks: a listener may return an
//! [`Override`] to replace the value the editor carries into its next
//! step. [`EventBus::emit`] threads that hook chain: the last non-`None`
//! override wins and the first listener error stops dispatch.
//! [`EventBus::emit_logged`] is the variant used for terminal
//! notifications, where listener failures are logged and swallowed so
//! they can never mask the operation's own outcome.

use std::collections::HashMap;

use crate::event::{Event, Override, Topic};

/// Priority assigned to subscriptions that don't specify one.
pub const DEFAULT_PRIORITY: i32 = 1000;

/// What a listener returns: optionally an [`Override`] for the carried
/// value, or an error.
pub type ListenerResult = anyhow::Result<Option<Override>>;

type Listener = Box<dyn FnMut(&Event) -> ListenerResult>;

/// Handle for removing a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: u64,
    priority: i32,
    once: bool,
    listener: Listener,
}

/// Ordered multi-subscriber dispatch table.
#[derive(Default)]
pub struct EventBus {
    topics: HashMap<Topic, Vec<Subscription>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe with [`DEFAULT_PRIORITY`].
    pub fn on(
        &mut self,
        topic: Topic,
        listener: impl FnMut(&Event) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.subscribe(topic, DEFAULT_PRIORITY, false, Box::new(listener))
    }

    /// Subscribe with an explicit priority. Higher priorities are notified
    /// first; listeners sharing a priority run in subscription order.
    pub fn on_priority(
        &mut self,
        topic: Topic,
        priority: i32,
        listener: impl FnMut(&Event) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.subscribe(topic, priority, false, Box::new(listener))
    }

    /// Subscribe for a single delivery.
    pub fn once(
        &mut self,
        topic: Topic,
        listener: impl FnMut(&Event) -> ListenerResult + 'static,
    ) -> SubscriptionId {
        self.subscribe(topic, DEFAULT_PRIORITY, true, Box::new(listener))
    }

    /// Remove a subscription. Returns whether it was still registered.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        for subscriptions in self.topics.values_mut() {
            if let Some(pos) = subscriptions.iter().position(|s| s.id == id.0) {
                subscriptions.remove(pos);
                return true;
            }
        }
        false
    }

    fn subscribe(
        &mut self,
        topic: Topic,
        priority: i32,
        once: bool,
        listener: Listener,
    ) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;

        let subscriptions = self.topics.entry(topic).or_default();
        // Stable position: after every subscription of >= priority.
        let pos = subscriptions
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(subscriptions.len());
        subscriptions.insert(
            pos,
            Subscription {
                id,
                priority,
                once,
                listener,
            },
        );

        SubscriptionId(id)
    }

    /// Deliver `event` to all subscribers of its topic.
    ///
    /// Returns the last non-`None` override, or the first listener error.
    /// One-shot subscriptions are removed even when they fail.
    pub fn emit(&mut self, event: &Event) -> ListenerResult {
        let Some(subscriptions) = self.topics.get_mut(&event.topic()) else {
            return Ok(None);
        };

        let mut carried = None;
        let mut index = 0;
        while index < subscriptions.len() {
            let once = subscriptions[index].once;
            let outcome = (subscriptions[index].listener)(event);
            if once {
                subscriptions.remove(index);
            } else {
                index += 1;
            }
            match outcome {
                Ok(Some(replacement)) => carried = Some(replacement),
                Ok(None) => {}
                Err(error) => return Err(error),
            }
        }

        Ok(carried)
    }

    /// Deliver `event`, logging listener failures instead of propagating
    /// them. Used for terminal notifications.
    pub fn emit_logged(&mut self, event: &Event) -> Option<Override> {
        let topic = event.topic();
        let Some(subscriptions) = self.topics.get_mut(&topic) else {
            return None;
        };

        let mut carried = None;
        let mut index = 0;
        while index < subscriptions.len() {
            let once = subscriptions[index].once;
            let outcome = (subscriptions[index].listener)(event);
            if once {
                subscriptions.remove(index);
            } else {
                index += 1;
            }
            match outcome {
                Ok(Some(replacement)) => carried = Some(replacement),
                Ok(None) => {}
                Err(error) => {
                    tracing::error!(topic = %topic, error = %error, "event listener failed");
                }
            }
        }

        carried
    }
}
