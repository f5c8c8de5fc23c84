//! Bounded-concurrency execution of fire-and-forget background refresh
//! tasks: a fixed number of worker loops draining a shared task queue. An
//! `mpsc` channel plays the queue; an in-flight counter plus
//! `tokio::sync::Notify` backs `wait()`. Tasks are async
//! (`Future<Output = ()>`) rather than plain closures since every real task
//! in this crate ends up awaiting the upstream HTTP client.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A fixed-size pool of tokio tasks consuming a shared queue of futures.
///
/// Each dequeued future runs inside its own `tokio::spawn`, so a panic
/// inside one task only poisons that task's `JoinHandle` — it never takes
/// down a worker loop or another in-flight task.
pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Task>,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl WorkerPool {
    /// Create a pool with `worker_count` concurrent workers and start them
    /// immediately; idle workers cost nothing but a parked task.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<Task>();
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let in_flight = Arc::new(AtomicUsize::new(0));
        let idle = Arc::new(Notify::new());

        for _ in 0..worker_count.max(1) {
            let receiver = Arc::clone(&receiver);
            let in_flight = Arc::clone(&in_flight);
            let idle = Arc::clone(&idle);
            tokio::spawn(async move {
                loop {
                    let task = {
                        let mut rx = receiver.lock().await;
                        rx.recv().await
                    };
                    let Some(task) = task else { break };
                    if tokio::spawn(task).await.is_err() {
                        tracing::warn!("background task panicked");
                    }
                    if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                        idle.notify_waiters();
                    }
                }
            });
        }

        Self {
            sender,
            in_flight,
            idle,
        }
    }

    /// Enqueue a task. Never blocks — the queue is unbounded, matching the
    /// best-effort background-refresh design of its callers.
    pub fn submit<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(Box::pin(task)).is_err() {
            // Pool has been dropped; undo the accounting bump so Wait()
            // callers don't hang on a task that was never run.
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Quiesce: returns once every task submitted so far has completed.
    ///
    /// Registers the `notified()` future before re-checking the counter on
    /// each iteration, so a worker's `notify_waiters()` landing between the
    /// check and the await can never be missed.
    pub async fn wait(&self) {
        loop {
            let notified = self.idle.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[tokio::test]
    async fn submit_runs_task() {
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);
        pool.submit(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        pool.wait().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wait_quiesces_after_burst() {
        let pool = WorkerPool::new(4);
        let counter = Arc::new(AtomicU32::new(0));
        for _ in 0..50 {
            let c = Arc::clone(&counter);
            pool.submit(async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.wait().await;
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn panicking_task_does_not_crash_pool() {
        let pool = WorkerPool::new(2);
        pool.submit(async { panic!("boom") });
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);
        pool.submit(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        pool.wait().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
