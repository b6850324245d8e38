//! # Worker Lane
//!
//! One dedicated worker thread, reused across requests, fed by a
//! single-slot request channel. Each request carries its own one-shot
//! response channel; the returned [`TaskHandle`] is the future side of
//! that channel.
//!
//! A lane accepts one in-flight request at a time. Dropping a handle is
//! the only cancellation: the worker still finishes and its unconsumed
//! response send is ignored, not treated as an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::{debug, warn};

use carve_mesh::GeometryError;

/// Worker threads get a generous stack: BSP clipping recursion depth
/// scales with mesh size.
const LANE_STACK_SIZE: usize = 16 * 1024 * 1024;

/// The pending result of a dispatched request.
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Non-blocking check for the result.
    ///
    /// Returns `None` while the worker is still computing. A disconnected
    /// channel means the worker died mid-request and settles the handle
    /// with [`GeometryError::WorkerUnavailable`].
    pub fn poll(&mut self) -> Option<Result<T, GeometryError>> {
        match self.receiver.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(GeometryError::worker_unavailable(
                "worker died before responding",
            ))),
        }
    }

    /// Blocks until the worker responds.
    pub fn wait(self) -> Result<T, GeometryError> {
        self.receiver
            .recv()
            .map_err(|_| GeometryError::worker_unavailable("worker died before responding"))
    }
}

/// A single reused worker thread processing one request at a time.
pub struct WorkerLane<Req, Resp> {
    name: &'static str,
    sender: Option<Sender<(Req, Sender<Resp>)>>,
    in_flight: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl<Req, Resp> WorkerLane<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Spawns the lane's worker thread.
    pub fn spawn(
        name: &'static str,
        work: impl Fn(Req) -> Resp + Send + 'static,
    ) -> Result<Self, GeometryError> {
        let (sender, receiver) = bounded::<(Req, Sender<Resp>)>(1);
        let in_flight = Arc::new(AtomicBool::new(false));
        let worker_flag = Arc::clone(&in_flight);

        let thread = std::thread::Builder::new()
            .name(format!("carve-{name}"))
            .stack_size(LANE_STACK_SIZE)
            .spawn(move || {
                for (request, respond) in receiver.iter() {
                    let response = work(request);
                    // Free the lane before responding so a caller woken by
                    // the response can dispatch again immediately.
                    worker_flag.store(false, Ordering::Release);
                    // A dropped handle means the caller gave up waiting;
                    // the finished result is simply discarded.
                    let _ = respond.send(response);
                }
            })
            .map_err(|e| {
                GeometryError::worker_unavailable(format!("failed to spawn {name} lane: {e}"))
            })?;

        debug!(lane = name, "worker lane started");
        Ok(Self {
            name,
            sender: Some(sender),
            in_flight,
            thread: Some(thread),
        })
    }

    /// Submits a request, returning the handle for its response.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidInput`] if a request is already in
    ///   flight: per-lane requests are strictly one at a time, and
    ///   overlapping them is a caller bug.
    /// - [`GeometryError::WorkerUnavailable`] if the worker thread has
    ///   died; the lane must be respawned.
    pub fn submit(&self, request: Req) -> Result<TaskHandle<Resp>, GeometryError> {
        // A crashed worker is reported as unavailable, not busy.
        let sender = match &self.sender {
            Some(sender) if self.thread.as_ref().is_some_and(|t| !t.is_finished()) => sender,
            _ => {
                warn!(lane = self.name, "worker lane is dead");
                return Err(GeometryError::worker_unavailable(format!(
                    "{} lane is dead and must be respawned",
                    self.name
                )));
            }
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GeometryError::invalid_input(format!(
                "{} lane already has a request in flight",
                self.name
            )));
        }

        let (respond, receiver) = bounded(1);
        if sender.send((request, respond)).is_err() {
            warn!(lane = self.name, "worker lane is dead");
            return Err(GeometryError::worker_unavailable(format!(
                "{} lane is dead and must be respawned",
                self.name
            )));
        }

        Ok(TaskHandle { receiver })
    }
}

impl<Req, Resp> Drop for WorkerLane<Req, Resp> {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop; any in-flight
        // handle settles to WorkerUnavailable when the response sender is
        // dropped with it.
        drop(self.sender.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        debug!(lane = self.name, "worker lane stopped");
    }
}
