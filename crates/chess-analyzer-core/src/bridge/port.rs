//! Typed port handles for both ends of the bridge.
//!
//! [`open_bridge`] creates one bridge per window.  The host keeps the
//! [`HostPort`]; the [`ViewPort`] goes to whatever runs inside the view (the
//! webview IPC handler for submissions and the automation controller for
//! deliveries).
//!
//! Both directions are backed by unbounded `tokio::sync::mpsc` channels, so
//! sending is synchronous and never blocks.  Receiving is async and yields
//! `None` once every sender for that direction has been dropped.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::bridge::channel::BridgeMessage;
use crate::domain::record::GameRecord;

/// Outcome of a fire-and-forget send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message was queued for the peer.
    Sent,
    /// The peer is gone; the message was discarded.
    Dropped,
}

impl Delivery {
    pub fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Creates a fresh bridge and returns its host and view ends.
pub fn open_bridge() -> (HostPort, ViewPort) {
    let (to_view_tx, to_view_rx) = mpsc::unbounded_channel();
    let (to_host_tx, to_host_rx) = mpsc::unbounded_channel();

    let host = HostPort {
        to_view: ToViewSender { tx: to_view_tx },
        submissions: SubmissionReceiver { rx: to_host_rx },
    };
    let view = ViewPort {
        sender: ViewSender { tx: to_host_tx },
        receiver: ViewReceiver { rx: to_view_rx },
    };
    (host, view)
}

fn send(tx: &UnboundedSender<GameRecord>, message: BridgeMessage) -> Delivery {
    let shown = message.to_string();
    match tx.send(message.payload) {
        Ok(()) => {
            trace!("queued {shown}");
            Delivery::Sent
        }
        Err(_) => {
            debug!("peer gone, dropped {shown}");
            Delivery::Dropped
        }
    }
}

fn try_recv(rx: &mut UnboundedReceiver<GameRecord>) -> Option<GameRecord> {
    match rx.try_recv() {
        Ok(record) => Some(record),
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
    }
}

// ── Host end ──────────────────────────────────────────────────────────────────

/// The host's end of one bridge.
pub struct HostPort {
    to_view: ToViewSender,
    submissions: SubmissionReceiver,
}

impl HostPort {
    /// Pushes a record towards the view (`load-pgn`).
    pub fn deliver(&self, record: GameRecord) -> Delivery {
        self.to_view.deliver(record)
    }

    /// Waits for the next record the view submitted (`send-pgn`).
    pub async fn next_submission(&mut self) -> Option<GameRecord> {
        self.submissions.recv().await
    }

    /// Splits the port so delivery and submission handling can live on
    /// different tasks (or threads).
    pub fn split(self) -> (ToViewSender, SubmissionReceiver) {
        (self.to_view, self.submissions)
    }
}

/// Sending half of the `load-pgn` direction.
#[derive(Debug, Clone)]
pub struct ToViewSender {
    tx: UnboundedSender<GameRecord>,
}

impl ToViewSender {
    /// Queues `record` for the view.  Returns [`Delivery::Dropped`] if the
    /// view side has already been torn down.
    pub fn deliver(&self, record: GameRecord) -> Delivery {
        send(&self.tx, BridgeMessage::to_view(record))
    }

    /// `true` once the view's receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of the `send-pgn` direction, held by the host.
#[derive(Debug)]
pub struct SubmissionReceiver {
    rx: UnboundedReceiver<GameRecord>,
}

impl SubmissionReceiver {
    pub async fn recv(&mut self) -> Option<GameRecord> {
        self.rx.recv().await
    }

    /// Non-blocking poll; `None` when nothing is queued.
    pub fn try_recv(&mut self) -> Option<GameRecord> {
        try_recv(&mut self.rx)
    }
}

// ── View end ──────────────────────────────────────────────────────────────────

/// The view's end of one bridge.
pub struct ViewPort {
    sender: ViewSender,
    receiver: ViewReceiver,
}

impl ViewPort {
    /// The single view-callable operation: hand `text` to the host.
    pub fn submit(&self, text: impl Into<String>) -> Delivery {
        self.sender.submit(text)
    }

    /// Waits for the next record pushed by the host.
    pub async fn next_delivery(&mut self) -> Option<GameRecord> {
        self.receiver.recv().await
    }

    pub fn split(self) -> (ViewSender, ViewReceiver) {
        (self.sender, self.receiver)
    }
}

/// Sending half of the `send-pgn` direction.
///
/// This is the only capability the view holds over the host: it can submit
/// text, and nothing else.
#[derive(Debug, Clone)]
pub struct ViewSender {
    tx: UnboundedSender<GameRecord>,
}

impl ViewSender {
    /// Submits `text` as a `bridge-forward` record.
    pub fn submit(&self, text: impl Into<String>) -> Delivery {
        send(&self.tx, BridgeMessage::to_host(GameRecord::from_bridge(text)))
    }
}

/// Receiving half of the `load-pgn` direction, held by the view.
#[derive(Debug)]
pub struct ViewReceiver {
    rx: UnboundedReceiver<GameRecord>,
}

impl ViewReceiver {
    pub async fn recv(&mut self) -> Option<GameRecord> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<GameRecord> {
        try_recv(&mut self.rx)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Provenance;

    #[test]
    fn test_deliver_reaches_view_unchanged() {
        // Arrange
        let (host, view) = open_bridge();
        let (_, mut rx) = view.split();

        // Act
        let outcome = host.deliver(GameRecord::from_cli("1. e4 e5 2. Nf3 *"));

        // Assert
        assert_eq!(outcome, Delivery::Sent);
        let received = rx.try_recv().expect("record must be queued");
        assert_eq!(received.text(), "1. e4 e5 2. Nf3 *");
        assert_eq!(received.provenance(), Provenance::CliArgument);
    }

    #[test]
    fn test_submit_tags_bridge_forward() {
        let (host, view) = open_bridge();
        let (_, mut submissions) = host.split();

        assert!(view.submit("1. d4 d5 *").is_sent());

        let record = submissions.try_recv().expect("submission queued");
        assert_eq!(record.provenance(), Provenance::BridgeForward);
        assert_eq!(record.text(), "1. d4 d5 *");
    }

    #[test]
    fn test_deliver_after_view_dropped_is_dropped_not_error() {
        // Arrange: tear down the view end entirely.
        let (host, view) = open_bridge();
        drop(view);

        // Act
        let outcome = host.deliver(GameRecord::from_cli("1. c4 *"));

        // Assert
        assert_eq!(outcome, Delivery::Dropped);
    }

    #[test]
    fn test_submit_after_host_dropped_is_dropped() {
        let (host, view) = open_bridge();
        drop(host);
        assert_eq!(view.submit("1. f4 *"), Delivery::Dropped);
    }

    #[test]
    fn test_to_view_sender_reports_closed() {
        let (host, view) = open_bridge();
        let (to_view, _) = host.split();
        assert!(!to_view.is_closed());
        drop(view);
        assert!(to_view.is_closed());
    }

    #[tokio::test]
    async fn test_next_delivery_ends_when_host_dropped() {
        let (host, mut view) = open_bridge();
        drop(host);
        assert!(view.next_delivery().await.is_none());
    }
}
