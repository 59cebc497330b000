use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::results::FarmEmissionResults;

const DEFAULT_CAPACITY: usize = 64;

/// Published after a farm's results are calculated and cached.
#[derive(Debug, Clone)]
pub struct FarmResultsCalculatedEvent {
    pub farm_emission_results: Arc<FarmEmissionResults>,
}

/// Fire-and-forget notification bus for calculated results.
///
/// Publishing never blocks and never fails the pipeline: with no subscribers the event is
/// dropped, and lagging subscribers lose the oldest events.
#[derive(Debug, Clone)]
pub struct FarmResultsEvents {
    sender: broadcast::Sender<FarmResultsCalculatedEvent>,
}

impl FarmResultsEvents {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FarmResultsCalculatedEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, farm_emission_results: Arc<FarmEmissionResults>) {
        let event = FarmResultsCalculatedEvent {
            farm_emission_results,
        };
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!("📣 Results event delivered to {} observer(s)", receivers),
            Err(_) => tracing::trace!("No observers for results event"),
        }
    }
}

/// 持續接收事件直到通道關閉，回傳收到的事件數
///
/// A lagging receiver skips the events it missed and keeps listening.
pub async fn observe_until_closed<F>(
    mut receiver: broadcast::Receiver<FarmResultsCalculatedEvent>,
    mut on_event: F,
) -> usize
where
    F: FnMut(&FarmResultsCalculatedEvent),
{
    let mut received = 0usize;
    loop {
        match receiver.recv().await {
            Ok(event) => {
                received += 1;
                on_event(&event);
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("⚠️ Observer lagged behind, skipped {} results event(s)", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
    received
}

impl Default for FarmResultsEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Farm;

    #[tokio::test]
    async fn test_subscriber_receives_same_results_object() {
        let events = FarmResultsEvents::new();
        let mut receiver = events.subscribe();

        let farm = Farm::new("Events", 1);
        let results = Arc::new(FarmEmissionResults::new(&farm));
        events.publish(Arc::clone(&results));

        let event = receiver.recv().await.unwrap();
        assert!(Arc::ptr_eq(&event.farm_emission_results, &results));
    }

    #[tokio::test]
    async fn test_lagging_observer_keeps_listening_until_closed() {
        let events = FarmResultsEvents::with_capacity(1);
        let receiver = events.subscribe();

        for name in ["First", "Second", "Third"] {
            let farm = Farm::new(name, 1);
            events.publish(Arc::new(FarmEmissionResults::new(&farm)));
        }
        drop(events);

        let mut names = Vec::new();
        let received = observe_until_closed(receiver, |event| {
            names.push(event.farm_emission_results.farm_name.clone())
        })
        .await;

        assert_eq!(received, 1);
        assert_eq!(names, vec!["Third".to_string()]);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let events = FarmResultsEvents::default();
        let farm = Farm::new("Nobody listening", 1);
        events.publish(Arc::new(FarmEmissionResults::new(&farm)));
    }
}
