/// Standing elapsed-time goal plus the one-shot "reached" flag of the
/// current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTracker {
    goal_ms: Option<u64>,
    reached: bool,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_goal_ms(goal_ms: Option<u64>) -> Self {
        let mut tracker = Self::new();
        if let Some(ms) = goal_ms {
            tracker.set_goal_ms(ms);
        }
        tracker
    }

    pub fn goal_ms(&self) -> Option<u64> {
        self.goal_ms
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    /// Set the goal; zero clears it. Either way the flag is re-armed.
    pub fn set_goal_ms(&mut self, goal_ms: u64) {
        self.goal_ms = (goal_ms > 0).then_some(goal_ms);
        self.reached = false;
    }

    pub fn clear_goal(&mut self) {
        self.goal_ms = None;
        self.reached = false;
    }

    /// Set the goal from user-entered seconds ("60", "90.5").
    ///
    /// Anything that is not a positive number clears the goal instead of
    /// failing.
    pub fn set_goal_from_text(&mut self, seconds_text: &str) -> Option<u64> {
        match parse_goal_seconds(seconds_text) {
            Some(ms) => self.set_goal_ms(ms),
            None => self.clear_goal(),
        }
        self.goal_ms
    }

    /// Returns true on the first update at or past the goal, and never again
    /// until the flag is re-armed.
    pub fn check_tick(&mut self, elapsed_ms: u64) -> bool {
        match self.goal_ms {
            Some(goal) if !self.reached && elapsed_ms >= goal => {
                self.reached = true;
                true
            }
            _ => false,
        }
    }

    pub fn on_reset(&mut self) {
        self.reached = false;
    }

    /// A start after the goal was reached begins a new attempt: the next
    /// tick at or past the goal notifies again.
    pub fn on_start(&mut self) {
        self.reached = false;
    }

    /// Fraction of the goal covered, capped at 1.0; 0.0 without a goal
    pub fn progress(&self, elapsed_ms: u64) -> f64 {
        match self.goal_ms {
            Some(goal) => (elapsed_ms as f64 / goal as f64).min(1.0),
            None => 0.0,
        }
    }
}

fn parse_goal_seconds(text: &str) -> Option<u64> {
    let secs = text.trim().parse::<f64>().ok()?;
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let ms = (secs * 1000.0).floor();
    (ms >= 1.0 && ms < u64::MAX as f64).then_some(ms as u64)
}
