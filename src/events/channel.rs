//! One-way event pipe from a running scan to its observer.
//!
//! The scan thread owns an [`EventSender`]; whoever started the scan drains
//! the matching [`EventReceiver`]. Delivery follows emission order and nothing
//! is dropped while the receiver is alive.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Scan-side end of the pipe. Clones feed the same receiver.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Wrap an existing crossbeam sender
    pub fn new(sender: Sender<Event>) -> Self {
        Self { inner: sender }
    }

    /// Queue `event` for the observer. A vanished observer is not an error;
    /// the scan runs the same with or without one.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Observer-side end of the pipe
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Next event, or `None` once the scan side is gone and the queue is empty
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Everything queued right now, for observers that poll on their own schedule
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }

    /// Blocking iterator that finishes when the last sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructors for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Unbounded pipe; the scan never waits on the observer.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        pair(unbounded())
    }

    /// Pipe holding at most `capacity` events. The scan blocks on a full pipe,
    /// which paces it to a slow observer.
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        pair(bounded(capacity))
    }
}

fn pair((sender, receiver): (Sender<Event>, Receiver<Event>)) -> (EventSender, EventReceiver) {
    (
        EventSender { inner: sender },
        EventReceiver { inner: receiver },
    )
}

/// Sender whose receiver is already gone, for scans nobody watches
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}
