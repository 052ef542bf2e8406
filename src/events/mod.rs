use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the service layer after successful writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CouponCreated(String),
    OrderCreated(Uuid),
    ItemAdded(Uuid),
    UserRegistered(Uuid),
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

    /// Sends an event, logging instead of failing when the channel is gone.
    /// Event delivery is best-effort and never blocks a write from succeeding.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event).await {
            warn!("{}", err);
        }
    }
}

/// Background consumer draining the event channel.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        info!(?event, "Processing event");
    }
    info!("Event channel closed, stopping event processor");
}
