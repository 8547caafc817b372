use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

// Events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    BasketCreated(Uuid),
    BasketItemAdded {
        basket_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    },
    BasketItemRemoved {
        basket_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging a warning on failure instead of surfacing it.
    /// Event delivery never fails the originating request.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event.clone()).await {
            warn!(?event, "{}", err);
        }
    }
}

/// Consumes events from the channel until all senders are dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "processing event");
    }
    info!("Event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        let basket_id = Uuid::new_v4();
        sender
            .send(Event::BasketCreated(basket_id))
            .await
            .expect("send should succeed");

        match rx.recv().await {
            Some(Event::BasketCreated(id)) => assert_eq!(id, basket_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or error out.
        sender
            .send_or_log(Event::BasketItemAdded {
                basket_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                quantity: 1,
            })
            .await;
    }
}
