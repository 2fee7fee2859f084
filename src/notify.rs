use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Outbound messages produced by delivery assignment. Transport (push/SMS) is
/// an external collaborator; this queue decouples it from the request path so
/// a slow or failing send never blocks an HTTP response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Pickup and drop instructions for the assigned delivery partner.
    PartnerAssignment {
        partner_id: Uuid,
        order_id: Uuid,
        pickup_address: String,
        drop_address: String,
        drop_pincode: String,
    },
    /// Assignment confirmation for the seller.
    SellerAssignment {
        seller_id: Uuid,
        order_id: Uuid,
        partner_name: String,
        partner_mobile: String,
    },
}

#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<Notification>,
}

impl NotificationQueue {
    /// Best-effort enqueue. A full or closed queue is logged and swallowed;
    /// the triggering mutation has already been persisted.
    pub fn enqueue(&self, notification: Notification) {
        if let Err(err) = self.tx.try_send(notification) {
            tracing::warn!(error = %err, "notification dropped");
        }
    }
}

/// Build the queue and spawn its dispatcher. The worker drains until every
/// sender is gone, so it winds down with the server.
pub fn start_dispatcher(capacity: usize) -> (NotificationQueue, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(run_dispatcher(rx));
    (NotificationQueue { tx }, handle)
}

async fn run_dispatcher(mut rx: mpsc::Receiver<Notification>) {
    tracing::info!("notification dispatcher started");
    while let Some(notification) = rx.recv().await {
        if let Err(err) = deliver(&notification).await {
            tracing::warn!(error = %err, "notification delivery failed");
        }
    }
    tracing::info!("notification channel closed, dispatcher stopping");
}

/// Delivery stub: serializes the payload into the log stream. A real
/// transport integration replaces this body.
async fn deliver(notification: &Notification) -> anyhow::Result<()> {
    let payload = serde_json::to_string(notification)?;
    tracing::info!(payload = %payload, "notification dispatched");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_delivers_in_order_and_survives_overflow() {
        let (queue, handle) = start_dispatcher(1);

        queue.enqueue(Notification::SellerAssignment {
            seller_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            partner_name: "A Partner".into(),
            partner_mobile: "9876543210".into(),
        });
        // Second enqueue may overflow the size-1 queue; it must not panic.
        queue.enqueue(Notification::PartnerAssignment {
            partner_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            pickup_address: "Shop 1".into(),
            drop_address: "Flat 2".into(),
            drop_pincode: "483501".into(),
        });

        drop(queue);
        handle.await.expect("dispatcher exits cleanly");
    }
}
