//! Timers driving the ping and poll loops
//!
//! At most one loop timer is pending at any time. Each tick is a mailbox
//! message; the reconciler decides on the tick whether to continue.

use std::time::Duration;

use mc_api::TransportKind;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Msg;

/// Which loop runs depends on the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopMode {
    /// Push transport: liveness ping, state arrives as notifications
    Ping,
    /// Poll-only transport: re-fetch every observed family each tick
    Poll,
}

pub(crate) struct PollScheduler {
    mode: LoopMode,
    timer: Option<JoinHandle<()>>,
    running: bool,
    ticks: u64,
}

impl PollScheduler {
    pub fn new(kind: TransportKind) -> Self {
        let mode = match kind {
            TransportKind::Push => LoopMode::Ping,
            TransportKind::PollOnly => LoopMode::Poll,
        };
        Self {
            mode,
            timer: None,
            running: false,
            ticks: 0,
        }
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the loop unless it is already running
    pub fn start(&mut self, mailbox: &mpsc::UnboundedSender<Msg>, first_tick: Duration, epoch: u64) {
        if self.running {
            return;
        }
        tracing::debug!(mode = ?self.mode, "Starting state loop");
        self.running = true;
        self.ticks = 0;
        self.schedule(mailbox, first_tick, epoch);
    }

    /// Replace any pending tick with one after `delay`
    pub fn schedule(&mut self, mailbox: &mpsc::UnboundedSender<Msg>, delay: Duration, epoch: u64) {
        if !self.running {
            return;
        }
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.timer = Some(send_after(mailbox.clone(), delay, Msg::Tick { epoch }));
    }

    /// Count a tick, returning its 1-based number
    pub fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if self.running {
            tracing::debug!(mode = ?self.mode, "Stopping state loop");
        }
        self.running = false;
        self.ticks = 0;
    }
}

/// Post `msg` to the mailbox after `delay`
pub(crate) fn send_after(mailbox: mpsc::UnboundedSender<Msg>, delay: Duration, msg: Msg) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = mailbox.send(msg);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_single_pending_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = PollScheduler::new(TransportKind::PollOnly);
        assert_eq!(scheduler.mode(), LoopMode::Poll);

        scheduler.start(&tx, Duration::from_secs(1), 0);
        scheduler.start(&tx, Duration::from_secs(1), 0);
        scheduler.schedule(&tx, Duration::from_secs(2), 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut ticks = 0;
        while let Ok(msg) = rx.try_recv() {
            assert!(matches!(msg, Msg::Tick { epoch: 0 }));
            ticks += 1;
        }
        assert_eq!(ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = PollScheduler::new(TransportKind::Push);
        assert_eq!(scheduler.mode(), LoopMode::Ping);

        scheduler.start(&tx, Duration::from_secs(10), 0);
        assert_eq!(scheduler.advance(), 1);
        scheduler.stop();
        assert!(!scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(rx.try_recv().is_err());

        scheduler.schedule(&tx, Duration::from_secs(1), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }
}
