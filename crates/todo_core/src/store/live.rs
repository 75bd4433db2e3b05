//! Push-based live query plumbing.
//!
//! A `LivePublisher` owns a broadcast channel; each `LiveSubscription` holds a
//! receiver for as long as its owner keeps it, and unregisters on drop.
//! Items are full snapshots, so a lagging subscriber may safely skip to the
//! newest retained one.

use log::warn;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Retained snapshots per subscriber before it starts lagging.
pub const DEFAULT_LIVE_CAPACITY: usize = 64;

/// Producer side of a live query.
#[derive(Debug)]
pub struct LivePublisher<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> LivePublisher<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Delivers `item` to every current subscriber.
    ///
    /// Returns the number of subscribers reached; zero is not an error.
    pub fn publish(&self, item: T) -> usize {
        self.sender.send(item).unwrap_or(0)
    }

    /// Registers a subscriber whose first item is `initial`.
    ///
    /// Callers must take `initial` and subscribe without a publish in between,
    /// otherwise the subscriber may observe a stale first item.
    pub fn subscribe(&self, initial: T) -> LiveSubscription<T> {
        LiveSubscription {
            pending: Some(initial),
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Default for LivePublisher<T> {
    fn default() -> Self {
        Self::new(DEFAULT_LIVE_CAPACITY)
    }
}

/// Consumer side of a live query.
#[derive(Debug)]
pub struct LiveSubscription<T> {
    pending: Option<T>,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone> LiveSubscription<T> {
    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<T> {
        if let Some(item) = self.pending.take() {
            return Some(item);
        }

        loop {
            match self.receiver.recv().await {
                Ok(item) => return Some(item),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("event=live_lagged module=store status=skip skipped={skipped}");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LivePublisher;

    #[tokio::test]
    async fn subscriber_sees_initial_then_published_items() {
        let publisher = LivePublisher::new(4);
        let mut subscription = publisher.subscribe(1);
        assert_eq!(publisher.publish(2), 1);

        assert_eq!(subscription.next().await, Some(1));
        assert_eq!(subscription.next().await, Some(2));
    }

    #[tokio::test]
    async fn dropping_subscription_unregisters_it() {
        let publisher = LivePublisher::new(4);
        let subscription = publisher.subscribe("a");
        assert_eq!(publisher.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(publisher.subscriber_count(), 0);
        assert_eq!(publisher.publish("b"), 0);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_to_retained_items() {
        let publisher = LivePublisher::new(2);
        let mut subscription = publisher.subscribe(0);
        for item in 1..=5 {
            publisher.publish(item);
        }

        assert_eq!(subscription.next().await, Some(0));
        assert_eq!(subscription.next().await, Some(4));
        assert_eq!(subscription.next().await, Some(5));
    }

    #[tokio::test]
    async fn subscription_ends_when_publisher_drops() {
        let publisher = LivePublisher::new(2);
        let mut subscription = publisher.subscribe(0);
        drop(publisher);

        assert_eq!(subscription.next().await, Some(0));
        assert_eq!(subscription.next().await, None);
    }
}
