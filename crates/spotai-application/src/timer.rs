//! Countdown ticker.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::event::GameEvent;

/// Emits [`GameEvent::Tick`] every `period` until cancelled or dropped.
///
/// Ticks carry the epoch of the game the timer was started for, so a tick
/// that was queued before cancellation can be recognised and discarded.
pub struct CountdownTimer {
    token: CancellationToken,
}

impl CountdownTimer {
    pub fn spawn(epoch: u64, period: Duration, events: UnboundedSender<GameEvent>) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if events.send(GameEvent::Tick { epoch }).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("[CountdownTimer] Timer {} stopped", epoch);
        });

        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = CountdownTimer::spawn(3, Duration::from_secs(1), tx);

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(GameEvent::Tick { epoch: 3 }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = CountdownTimer::spawn(1, Duration::from_secs(1), tx);
        assert_eq!(rx.recv().await, Some(GameEvent::Tick { epoch: 1 }));

        drop(timer);

        // the task exits and drops its sender, closing the channel
        assert_eq!(rx.recv().await, None);
    }
}
