//! Simulator threads and their bounded-timeout shutdown.
//!
//! [`WorkerPool`] spawns one named OS thread per shape. A finishing worker
//! sends its [`SimulatorReport`] on a private `done` channel; shutdown waits
//! on that channel with a deadline per worker, so a stalled worker can never
//! hang the process. Threads cannot be killed, so a worker that misses its
//! deadline is detached: its handle is dropped and the thread dies with the
//! process.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{error, info, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::simulation::channel::StateSender;
use crate::simulation::shape::ShapeId;
use crate::simulation::shutdown::ShutdownSignal;
use crate::simulation::simulator::{ShapeSimulator, SimulatorParams, SimulatorReport};

struct Worker {
    shape_id: ShapeId,
    handle: JoinHandle<()>,
}

/// Outcome of [`WorkerPool::shutdown`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShutdownSummary {
    /// Reports of the workers that stopped in time, ordered by shape id.
    pub reports: Vec<SimulatorReport>,
    /// Shapes whose worker missed its deadline and was detached.
    pub detached: Vec<ShapeId>,
    /// Shapes whose worker panicked.
    pub panicked: Vec<ShapeId>,
}

/// The running simulator threads of one screensaver run.
pub struct WorkerPool {
    workers: Vec<Worker>,
    shutdown: ShutdownSignal,
    done_tx: Sender<SimulatorReport>,
    done_rx: Receiver<SimulatorReport>,
}

impl WorkerPool {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            workers: Vec::new(),
            shutdown,
            done_tx,
            done_rx,
        }
    }

    /// The signal every worker of this pool watches.
    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Spawn a [`ShapeSimulator`] publishing into `tx`.
    pub fn spawn_simulator(
        &mut self,
        params: SimulatorParams,
        tx: StateSender,
    ) -> Result<(), String> {
        let shutdown = self.shutdown.clone();
        self.spawn(params.shape_id, move || {
            ShapeSimulator::new(params).run(tx, shutdown)
        })
    }

    /// Spawn an arbitrary worker body for `shape_id`. Its return value is
    /// delivered to [`WorkerPool::shutdown`].
    pub fn spawn<F>(&mut self, shape_id: ShapeId, body: F) -> Result<(), String>
    where
        F: FnOnce() -> SimulatorReport + Send + 'static,
    {
        let done_tx = self.done_tx.clone();
        let handle = std::thread::Builder::new()
            .name(format!("shape-{shape_id}"))
            .spawn(move || {
                let report = body();
                let _ = done_tx.send(report);
            })
            .map_err(|e| format!("Failed to spawn simulator {}: {}", shape_id, e))?;
        self.workers.push(Worker { shape_id, handle });
        Ok(())
    }

    /// Set the shutdown signal and collect the workers.
    ///
    /// Each worker gets up to `per_worker_timeout` to report after the
    /// previous one was handled. Workers that miss it are detached.
    pub fn shutdown(self, per_worker_timeout: Duration) -> ShutdownSummary {
        self.shutdown.set();

        let WorkerPool {
            workers, done_rx, ..
        } = self;

        let mut reports: FxHashMap<ShapeId, SimulatorReport> = FxHashMap::default();
        let mut summary = ShutdownSummary::default();

        for worker in workers {
            let deadline = Instant::now() + per_worker_timeout;
            while !reports.contains_key(&worker.shape_id) {
                match done_rx.recv_deadline(deadline) {
                    Ok(report) => {
                        reports.insert(report.shape_id, report);
                    }
                    Err(_) => break,
                }
            }

            if reports.contains_key(&worker.shape_id) || worker.handle.is_finished() {
                if worker.handle.join().is_err() {
                    error!("shape {} simulator panicked", worker.shape_id);
                    summary.panicked.push(worker.shape_id);
                }
            } else {
                warn!(
                    "shape {} simulator did not stop within {:?}, detaching",
                    worker.shape_id, per_worker_timeout
                );
                summary.detached.push(worker.shape_id);
            }
        }

        let mut reports: Vec<SimulatorReport> = reports.into_values().collect();
        reports.sort_by_key(|r| r.shape_id);
        summary.reports = reports;

        info!(
            "simulators stopped: {} joined, {} detached, {} panicked",
            summary.reports.len(),
            summary.detached.len(),
            summary.panicked.len()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(shape_id: ShapeId, ticks: u64) -> SimulatorReport {
        SimulatorReport {
            shape_id,
            ticks,
            ..SimulatorReport::default()
        }
    }

    #[test]
    fn test_shutdown_collects_cooperative_workers() {
        let signal = ShutdownSignal::new();
        let mut pool = WorkerPool::new(signal.clone());
        for id in 0..3 {
            let s = signal.clone();
            pool.spawn(id, move || {
                let mut ticks = 0;
                while !s.wait_timeout(Duration::from_millis(5)) {
                    ticks += 1;
                }
                report(id, ticks)
            })
            .unwrap();
        }
        assert_eq!(pool.len(), 3);
        std::thread::sleep(Duration::from_millis(30));

        let summary = pool.shutdown(Duration::from_millis(500));
        assert!(signal.is_set());
        assert_eq!(summary.reports.len(), 3);
        assert!(summary.detached.is_empty());
        let ids: Vec<ShapeId> = summary.reports.iter().map(|r| r.shape_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_shutdown_detaches_stalled_worker() {
        let signal = ShutdownSignal::new();
        let mut pool = WorkerPool::new(signal.clone());
        let s = signal.clone();
        pool.spawn(0, move || {
            while !s.wait_timeout(Duration::from_millis(5)) {}
            report(0, 1)
        })
        .unwrap();
        // Ignores the signal entirely.
        pool.spawn(1, || {
            std::thread::sleep(Duration::from_secs(3));
            report(1, 1)
        })
        .unwrap();

        let start = Instant::now();
        let summary = pool.shutdown(Duration::from_millis(50));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(summary.detached, vec![1]);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].shape_id, 0);
    }

    #[test]
    fn test_shutdown_reports_panicked_worker() {
        let signal = ShutdownSignal::new();
        let mut pool = WorkerPool::new(signal);
        pool.spawn(4, || panic!("boom")).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let summary = pool.shutdown(Duration::from_millis(200));
        assert_eq!(summary.panicked, vec![4]);
        assert!(summary.detached.is_empty());
    }

    #[test]
    fn test_shutdown_empty_pool() {
        let pool = WorkerPool::new(ShutdownSignal::new());
        assert!(pool.is_empty());
        let summary = pool.shutdown(Duration::from_millis(10));
        assert!(summary.reports.is_empty());
    }
}
