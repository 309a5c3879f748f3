use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ActionNamespace, SurfaceId};

/// Process-wide lifecycle events, independent of the invoke/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    SurfaceOpened(SurfaceId),
    SurfaceClosed(SurfaceId),
    ChannelBound { channel: String, surface: SurfaceId },
    ActionsReloaded { namespace: ActionNamespace, count: usize },
    ConfigReloaded,
    QuitRequested,
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::ConfigReloaded);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, Event::ConfigReloaded);
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::Shutdown);

        assert_eq!(rx1.recv().await.unwrap(), Event::Shutdown);
        assert_eq!(rx2.recv().await.unwrap(), Event::Shutdown);
    }

    #[tokio::test]
    async fn surface_lifecycle_events_keep_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let surface = SurfaceId::new(1);

        bus.publish(Event::SurfaceOpened(surface));
        bus.publish(Event::ChannelBound {
            channel: "_top".into(),
            surface,
        });
        bus.publish(Event::SurfaceClosed(surface));

        assert_eq!(rx.recv().await.unwrap(), Event::SurfaceOpened(surface));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::ChannelBound { ref channel, .. } if channel == "_top"
        ));
        assert_eq!(rx.recv().await.unwrap(), Event::SurfaceClosed(surface));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(Event::QuitRequested), 0);
    }

    #[tokio::test]
    async fn publish_returns_subscriber_count() {
        let bus = EventBus::new(16);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();

        assert_eq!(
            bus.publish(Event::ActionsReloaded {
                namespace: ActionNamespace::User,
                count: 4,
            }),
            2
        );
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomeNewEventWeNeverHeardOf","data":null}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event, Event::Unknown);
    }
}
