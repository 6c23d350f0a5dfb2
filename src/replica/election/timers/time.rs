#[cfg(test)]
use tokio::sync::watch;
#[cfg(test)]
use tokio::time::Duration;
use tokio::time::Instant;

/// Clock lets the election timers run against real time in production and a hand-driven clock
/// in tests.
#[async_trait::async_trait]
pub(crate) trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    async fn sleep_until(&mut self, deadline: Instant);
}

#[derive(Copy, Clone)]
pub(crate) struct RealClock;

#[async_trait::async_trait]
impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&mut self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

#[cfg(test)]
pub(crate) fn manual_clock() -> (ManualClock, ManualClockDriver) {
    let start = Instant::now();
    let (tx, rx) = watch::channel(start);

    (ManualClock { now: rx }, ManualClockDriver { now: tx, start })
}

/// ManualClock only moves when its driver says so.
#[cfg(test)]
#[derive(Clone)]
pub(crate) struct ManualClock {
    now: watch::Receiver<Instant>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.borrow()
    }

    async fn sleep_until(&mut self, deadline: Instant) {
        while *self.now.borrow() < deadline {
            if self.now.changed().await.is_err() {
                // Driver is gone, time is frozen forever.
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
pub(crate) struct ManualClockDriver {
    now: watch::Sender<Instant>,
    start: Instant,
}

#[cfg(test)]
impl ManualClockDriver {
    pub(crate) fn elapsed(&self) -> Duration {
        *self.now.borrow() - self.start
    }

    /// Move time forward. Every sleeper whose deadline is now reached wakes up.
    pub(crate) fn advance(&mut self, duration: Duration) {
        let next = *self.now.borrow() + duration;
        let _ = self.now.send(next);
    }
}
