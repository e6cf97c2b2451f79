//! Async tick source for headless sessions
//!
//! The controller sits behind one mutex per session. A tokio task owns
//! the interval and ticks the controller once per period; pausing or
//! resetting aborts that task, and so does dropping its handle.
//!
//! Aborting is cooperative, so every ticker also carries the generation
//! it was spawned for. Pausing or resetting bumps the generation under
//! the same lock the tick takes; a task from an older generation can
//! never tick the controller again.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::controller::{BreathingController, SessionView, TickOutcome};
use crate::metronome::MIN_PERIOD;

#[derive(Debug, Default)]
struct Slot {
    controller: BreathingController,
    generation: u64,
}

/// A controller shared between a driver and its ticker task
#[derive(Debug, Clone, Default)]
pub struct SharedController {
    inner: Arc<Mutex<Slot>>,
}

impl SharedController {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // The slot holds plain values and never panics mid-update
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("controller lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Run `f` with exclusive access to the controller
    pub fn with<R>(&self, f: impl FnOnce(&mut BreathingController) -> R) -> R {
        f(&mut self.lock().controller)
    }

    pub fn view(&self) -> SessionView {
        self.lock().controller.view()
    }

    /// Generation new tickers should be spawned for
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Invalidate every ticker spawned so far, then run `f`, atomically
    pub fn retire_with<R>(&self, f: impl FnOnce(&mut BreathingController) -> R) -> R {
        let mut slot = self.lock();
        slot.generation += 1;
        f(&mut slot.controller)
    }

    /// Tick on behalf of a ticker, unless its generation was retired
    fn tick_for(&self, generation: u64) -> Option<TickEvent> {
        let mut slot = self.lock();
        if slot.generation != generation {
            return None;
        }
        let c = &mut slot.controller;
        Some(TickEvent {
            outcome: c.tick(),
            view: c.view(),
            cycles_completed: c.cycles_completed(),
        })
    }
}

/// One tick as seen by the ticker task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub outcome: TickOutcome,
    pub view: SessionView,
    pub cycles_completed: u64,
}

/// Handle to a running ticker task
#[derive(Debug)]
pub struct PhaseTicker {
    handle: JoinHandle<()>,
}

impl PhaseTicker {
    /// Spawn a task ticking `controller` every `period` for `generation`
    ///
    /// The task stops on its own when its generation is retired, the
    /// controller is found paused, or the event receiver is gone. Periods
    /// below [`MIN_PERIOD`] are raised to it. Must be called within a
    /// tokio runtime.
    pub fn spawn(
        controller: SharedController,
        generation: u64,
        period: Duration,
        events: mpsc::UnboundedSender<TickEvent>,
    ) -> Self {
        let period = period.max(MIN_PERIOD);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let Some(event) = controller.tick_for(generation) else {
                    debug!(generation, "ticker generation retired, exiting");
                    break;
                };

                if event.outcome == TickOutcome::Idle {
                    debug!("controller not running, ticker exiting");
                    break;
                }
                if events.send(event).is_err() {
                    debug!("tick receiver dropped, ticker exiting");
                    break;
                }
            }
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for PhaseTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A breathing session driven by a tokio interval
#[derive(Debug)]
pub struct Breather {
    controller: SharedController,
    ticker: Option<PhaseTicker>,
    period: Duration,
    events: mpsc::UnboundedSender<TickEvent>,
}

impl Breather {
    /// Create a paused session and the receiver its tick events go to
    ///
    /// Periods below [`MIN_PERIOD`] are raised to it.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<TickEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let breather = Self {
            controller: SharedController::new(),
            ticker: None,
            period: period.max(MIN_PERIOD),
            events,
        };
        (breather, rx)
    }

    pub fn start(&mut self) {
        self.controller.with(|c| c.start());

        let alive = self.ticker.as_ref().is_some_and(|t| !t.is_finished());
        if !alive {
            self.ticker = Some(PhaseTicker::spawn(
                self.controller.clone(),
                self.controller.generation(),
                self.period,
                self.events.clone(),
            ));
        }
    }

    pub fn pause(&mut self) {
        self.controller.retire_with(|c| c.pause());
        self.stop_ticker();
    }

    pub fn reset(&mut self) {
        self.controller.retire_with(|c| c.reset());
        self.stop_ticker();
    }

    pub fn view(&self) -> SessionView {
        self.controller.view()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.controller.with(|c| c.cycles_completed())
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    const FAST: Duration = Duration::from_millis(5);

    async fn wait_for_elapsed(breather: &Breather, target: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while breather.view().elapsed_total < target {
            assert!(Instant::now() < deadline, "ticker did not reach {}", target);
            time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_ticker_advances_controller() {
        let (mut breather, mut rx) = Breather::new(FAST);
        breather.start();

        let mut advanced = Vec::new();
        let mut cycles = 0;
        while advanced.len() < 4 {
            let event = rx.recv().await.unwrap();
            if let TickOutcome::Advanced { to, .. } = event.outcome {
                advanced.push((to, event.view.remaining, event.view.elapsed_total));
                cycles = event.cycles_completed;
            }
        }
        breather.pause();

        assert_eq!(
            advanced,
            vec![
                (Phase::Hold, 4, 4),
                (Phase::Exhale, 4, 8),
                (Phase::Rest, 2, 12),
                (Phase::Inhale, 4, 14),
            ]
        );
        assert_eq!(cycles, 1);
        assert!(!breather.view().running);
    }

    #[tokio::test]
    async fn test_pause_stops_ticking() {
        let (mut breather, _rx) = Breather::new(FAST);
        breather.start();
        wait_for_elapsed(&breather, 3).await;
        breather.pause();
        assert!(!breather.is_ticking());

        let before = breather.view();
        time::sleep(FAST * 10).await;
        assert_eq!(breather.view(), before);
        assert!(!before.running);
    }

    #[tokio::test]
    async fn test_reset_stops_ticking() {
        let (mut breather, _rx) = Breather::new(FAST);
        breather.start();
        wait_for_elapsed(&breather, 2).await;
        breather.reset();
        time::sleep(FAST * 10).await;

        let v = breather.view();
        assert_eq!((v.running, v.phase, v.remaining, v.elapsed_total), (false, Phase::Inhale, 4, 0));
    }

    #[tokio::test]
    async fn test_resume_after_pause() {
        let (mut breather, _rx) = Breather::new(FAST);
        breather.start();
        wait_for_elapsed(&breather, 2).await;
        breather.pause();
        let paused_at = breather.view().elapsed_total;

        breather.start();
        assert!(breather.is_ticking());
        wait_for_elapsed(&breather, paused_at + 2).await;
        breather.pause();
        assert!(breather.view().elapsed_total >= paused_at + 2);
    }

    #[tokio::test]
    async fn test_dropping_ticker_aborts_task() {
        let controller = SharedController::new();
        controller.with(|c| c.start());
        let (tx, _rx) = mpsc::unbounded_channel();

        let ticker = PhaseTicker::spawn(controller.clone(), controller.generation(), FAST, tx);
        drop(ticker);

        let before = controller.view();
        time::sleep(FAST * 10).await;
        assert_eq!(controller.view(), before);
    }

    #[tokio::test]
    async fn test_ticker_exits_when_controller_paused() {
        let controller = SharedController::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let ticker = PhaseTicker::spawn(controller.clone(), controller.generation(), FAST, tx);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !ticker.is_finished() {
            assert!(Instant::now() < deadline, "ticker kept running while paused");
            time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(controller.view().elapsed_total, 0);
    }

    #[tokio::test]
    async fn test_retired_ticker_never_ticks() {
        let controller = SharedController::new();
        controller.with(|c| c.start());
        let stale = controller.generation();
        controller.retire_with(|_| ());
        let (tx, _rx) = mpsc::unbounded_channel();

        // The controller is running, but this ticker belongs to an old generation
        let ticker = PhaseTicker::spawn(controller.clone(), stale, FAST, tx);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !ticker.is_finished() {
            assert!(Instant::now() < deadline, "retired ticker kept running");
            time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(controller.view().elapsed_total, 0);
        assert!(controller.view().running);
    }

    #[tokio::test]
    async fn test_reset_then_start_ticks_once_per_period() {
        let (mut breather, mut rx) = Breather::new(FAST);
        breather.start();
        wait_for_elapsed(&breather, 2).await;
        breather.reset();
        while rx.try_recv().is_ok() {}
        breather.start();

        for expected in 1..=5 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.view.elapsed_total, expected);
        }
        breather.pause();
    }

    #[tokio::test]
    async fn test_zero_period_is_raised_to_minimum() {
        let (mut breather, _rx) = Breather::new(Duration::ZERO);
        breather.start();
        wait_for_elapsed(&breather, 3).await;
        breather.pause();
        assert!(breather.view().elapsed_total >= 3);
    }
}
