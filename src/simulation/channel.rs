//! Bounded, lossy snapshot channel between simulators and the coordinator.
//!
//! Many [`StateSender`]s feed one [`StateReceiver`]. Neither end ever blocks:
//! a send into a full channel is rejected and the snapshot is dropped, and a
//! drain returns whatever is queued right now (possibly nothing).
//!
//! This is a "latest wins, stale is fine" channel, not a reliable queue.
//! When it fills up the consumer is slower than the producers combined, and
//! the load is shed at whichever producer hits the full channel.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use log::debug;

use crate::simulation::shape::Snapshot;

/// Create a snapshot channel holding at most `capacity` messages.
///
/// A capacity of zero is bumped to one; a rendezvous channel would reject
/// every send because the coordinator never blocks in a receive.
pub fn state_channel(capacity: usize) -> (StateSender, StateReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    (StateSender { tx }, StateReceiver { rx })
}

/// Producer end. Cheap to clone; one clone per simulator.
#[derive(Debug, Clone)]
pub struct StateSender {
    tx: Sender<Snapshot>,
}

impl StateSender {
    /// Offer a snapshot without blocking.
    ///
    /// Returns `false` when the snapshot was dropped because the channel is
    /// full or the coordinator is gone. Callers treat that as a normal
    /// outcome.
    pub fn try_send(&self, snapshot: Snapshot) -> bool {
        match self.tx.try_send(snapshot) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                debug!("state channel full, dropped frame of shape {}", dropped.shape_id);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer end, owned by the coordinator.
#[derive(Debug)]
pub struct StateReceiver {
    rx: Receiver<Snapshot>,
}

impl StateReceiver {
    /// Drain every snapshot queued at the time of the call, in arrival order.
    ///
    /// Only the messages present when the drain starts are taken, so busy
    /// producers cannot keep the coordinator in here forever.
    pub fn try_receive_all(&self) -> Vec<Snapshot> {
        let pending = self.rx.len();
        self.rx.try_iter().take(pending).collect()
    }

    /// Number of snapshots currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of queued snapshots.
    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::shape::PointBuf;
    use raylib::prelude::Vector2;
    use std::time::{Duration, Instant};

    fn snap(shape_id: usize, color_index: usize) -> Snapshot {
        let mut points = PointBuf::new();
        points.push(Vector2 {
            x: color_index as f32,
            y: 0.0,
        });
        Snapshot {
            shape_id,
            points,
            color_index,
        }
    }

    #[test]
    fn test_send_into_full_channel_is_rejected_immediately() {
        let (tx, rx) = state_channel(4);
        for i in 0..4 {
            assert!(tx.try_send(snap(0, i)));
        }
        let start = Instant::now();
        assert!(!tx.try_send(snap(0, 99)));
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(rx.len(), 4);
    }

    #[test]
    fn test_drain_returns_all_in_send_order() {
        let (tx, rx) = state_channel(64);
        for i in 0..10 {
            assert!(tx.try_send(snap(i % 3, i)));
        }
        let drained = rx.try_receive_all();
        assert_eq!(drained.len(), 10);
        for (i, s) in drained.iter().enumerate() {
            assert_eq!(s.color_index, i);
            assert_eq!(s.shape_id, i % 3);
        }
        assert!(rx.is_empty());
    }

    #[test]
    fn test_drain_empty_channel() {
        let (_tx, rx) = state_channel(8);
        assert!(rx.try_receive_all().is_empty());
    }

    #[test]
    fn test_drain_frees_capacity() {
        let (tx, rx) = state_channel(2);
        assert!(tx.try_send(snap(0, 0)));
        assert!(tx.try_send(snap(1, 1)));
        assert!(!tx.try_send(snap(2, 2)));
        assert_eq!(rx.try_receive_all().len(), 2);
        assert!(tx.try_send(snap(2, 2)));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = state_channel(2);
        drop(rx);
        assert!(!tx.try_send(snap(0, 0)));
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let (tx, rx) = state_channel(0);
        assert_eq!(rx.capacity(), 1);
        assert!(tx.try_send(snap(0, 0)));
        assert!(!tx.try_send(snap(0, 1)));
    }

    #[test]
    fn test_many_producers_one_consumer() {
        let (tx, rx) = state_channel(1024);
        let handles: Vec<_> = (0..4)
            .map(|id| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        assert!(tx.try_send(snap(id, i)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let drained = rx.try_receive_all();
        assert_eq!(drained.len(), 400);
        // Per producer, arrival order matches send order.
        for id in 0..4 {
            let colors: Vec<usize> = drained
                .iter()
                .filter(|s| s.shape_id == id)
                .map(|s| s.color_index)
                .collect();
            assert_eq!(colors, (0..100).collect::<Vec<_>>());
        }
    }
}
