use std::{future::Future, ops::ControlFlow, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};

/// Periodic tick source owned by a live session. The tick callback runs on a
/// spawned task; returning `ControlFlow::Break` ends the clock from inside.
/// Dropping the clock stops it.
pub struct SessionClock {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl SessionClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts ticking every `period`, first tick one period from now.
    /// Restarting replaces any previous callback.
    pub fn start<F, Fut>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.stop();

        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if on_tick().await.is_break() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}
