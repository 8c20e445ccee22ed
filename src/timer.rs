/// Run/pause state and elapsed-time computation.
///
/// Elapsed time is always `now - start_reference` while running and is never
/// accumulated tick by tick, so irregular ticks cannot drift it. All methods
/// take `now_ms` from the caller's clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerEngine {
    elapsed_ms: u64,
    running: bool,
    // signed: a resumed value can exceed the clock reading
    start_reference_ms: i64,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin or resume. Ignored while already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.start_reference_ms = signed(now_ms).saturating_sub(signed(self.elapsed_ms));
        self.running = true;
        true
    }

    /// Freeze elapsed time. Ignored while stopped.
    pub fn stop(&mut self, now_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms = self.live_elapsed(now_ms);
        self.running = false;
        true
    }

    pub fn sample(&self, now_ms: u64) -> u64 {
        if self.running {
            self.live_elapsed(now_ms)
        } else {
            self.elapsed_ms
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.start_reference_ms = 0;
        self.running = false;
    }

    /// Restore a timer that was running when its state was saved. Time that
    /// passed while nothing was sampling is not counted.
    pub fn resume_from(&mut self, elapsed_ms: u64, now_ms: u64) {
        self.elapsed_ms = elapsed_ms;
        self.running = false;
        self.start(now_ms);
    }

    /// Restore a paused timer
    pub fn restore_paused(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
        self.start_reference_ms = 0;
        self.running = false;
    }

    fn live_elapsed(&self, now_ms: u64) -> u64 {
        // a clock that stepped backwards past the reference reads as zero
        u64::try_from(signed(now_ms).saturating_sub(self.start_reference_ms)).unwrap_or(0)
    }
}

fn signed(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}
