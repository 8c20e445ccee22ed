use chrono::Local;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::goal::GoalTracker;
use crate::laps::{Lap, LapRank, LapRecorder, LapSummary};
use crate::persist::{Persistence, Restored, TimerSnapshot, GOAL_KEY, SESSIONS_KEY, STATE_KEY};
use crate::runtime::{TickScheduler, TickSubscription};
use crate::session::{Session, SessionArchive};
use crate::store::KeyValueStore;
use crate::timer::TimerEngine;

/// Notifications for the presentation layer, drained with
/// [`StopwatchEngine::drain_events`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    GoalReached { goal_ms: u64, elapsed_ms: u64 },
    SessionArchived { id: String, total_ms: u64, lap_count: usize },
    HistoryCleared,
    /// A stored blob was unusable at startup and was reset to defaults
    StateRecovered { key: &'static str, reason: String },
    /// The store failed to read a key; it is left untouched until readable
    StateUnreadable { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// While running, re-save the timer after this much elapsed time
    pub checkpoint_interval_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            checkpoint_interval_ms: 1_000,
        }
    }
}

/// The stopwatch: timer, laps, goal and history behind one context object.
///
/// Every mutating operation mirrors the full state to the store. Store
/// failures are logged and never undo the in-memory change. Operations whose
/// preconditions do not hold (lap while stopped, stop while stopped) are
/// silently ignored.
#[derive(Debug)]
pub struct StopwatchEngine<C: Clock, S: KeyValueStore> {
    clock: C,
    persistence: Persistence<S>,
    timer: TimerEngine,
    laps: LapRecorder,
    goal: GoalTracker,
    archive: SessionArchive,
    scheduler: TickScheduler,
    ticks: Option<TickSubscription>,
    events: Vec<EngineEvent>,
    options: EngineOptions,
    last_checkpoint_ms: u64,
}

impl<C: Clock, S: KeyValueStore> StopwatchEngine<C, S> {
    /// Build the engine from whatever the store holds.
    ///
    /// A timer saved while running keeps running from its saved elapsed
    /// time. Discarded keys show up as [`EngineEvent::StateRecovered`], keys
    /// the store could not read as [`EngineEvent::StateUnreadable`].
    pub fn restore(
        clock: C,
        mut persistence: Persistence<S>,
        scheduler: TickScheduler,
        options: EngineOptions,
    ) -> Self {
        let restored = persistence.load();
        let mut events: Vec<EngineEvent> = restored
            .recoveries()
            .into_iter()
            .map(|(key, reason)| EngineEvent::StateRecovered { key, reason })
            .collect();
        events.extend(
            restored
                .unreadable()
                .into_iter()
                .map(|(key, reason)| EngineEvent::StateUnreadable { key, reason }),
        );

        let mut engine = Self {
            clock,
            persistence,
            timer: TimerEngine::new(),
            laps: LapRecorder::new(),
            goal: GoalTracker::with_goal_ms(restored.goal.into_option()),
            archive: SessionArchive::from_sessions(restored.sessions.unwrap_or_default()),
            scheduler,
            ticks: None,
            events,
            options,
            last_checkpoint_ms: 0,
        };
        engine.adopt_snapshot(restored.timer.unwrap_or_default());
        engine
    }

    /// Start when stopped, stop when running. Returns whether it now runs.
    pub fn start_or_stop(&mut self) -> bool {
        if self.timer.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.timer.is_running()
    }

    pub fn start(&mut self) -> bool {
        self.reconcile_unreadable();
        let now = self.clock.now_ms();
        let elapsed = self.timer.sample(now);
        if !self.timer.start(now) {
            return false;
        }

        self.goal.on_start();
        self.ticks = Some(self.scheduler.subscribe());
        self.last_checkpoint_ms = elapsed;
        debug!(elapsed_ms = elapsed, "stopwatch started");
        self.persist();
        true
    }

    pub fn stop(&mut self) -> bool {
        self.reconcile_unreadable();
        let now = self.clock.now_ms();
        if !self.timer.stop(now) {
            return false;
        }

        self.ticks = None;
        let elapsed = self.timer.sample(now);
        self.check_goal(elapsed);
        debug!(elapsed_ms = elapsed, "stopwatch stopped");
        self.persist();
        true
    }

    /// Record a lap at the current elapsed time. Ignored while stopped.
    pub fn record_lap(&mut self) -> Option<Lap> {
        if !self.timer.is_running() {
            return None;
        }

        self.reconcile_unreadable();
        let elapsed = self.timer.sample(self.clock.now_ms());
        self.check_goal(elapsed);
        let Some(lap) = self.laps.record(elapsed) else {
            debug!(elapsed_ms = elapsed, "ignoring zero-length lap");
            return None;
        };

        debug!(number = lap.number, lap_ms = lap.lap_time, "lap recorded");
        self.persist();
        Some(lap)
    }

    /// Periodic sample while running. Returns the elapsed time, or `None`
    /// when stopped.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.timer.is_running() {
            return None;
        }

        let elapsed = self.timer.sample(self.clock.now_ms());
        self.check_goal(elapsed);

        if elapsed.saturating_sub(self.last_checkpoint_ms) >= self.options.checkpoint_interval_ms {
            self.last_checkpoint_ms = elapsed;
            self.reconcile_unreadable();
            if !self.persistence.is_held(STATE_KEY) {
                let snapshot = self.snapshot();
                if let Err(err) = self.persistence.save_timer(&snapshot) {
                    warn!(error = %err, "failed to checkpoint running timer");
                }
            }
        }
        Some(elapsed)
    }

    /// Stop, archive the run if it had any activity, and clear it.
    ///
    /// Calling it again right away changes nothing and archives nothing.
    pub fn reset_and_archive(&mut self) -> Option<Session> {
        self.reconcile_unreadable();
        let final_elapsed = self.timer.sample(self.clock.now_ms());
        self.ticks = None;

        let laps = self.laps.take();
        let archived = self
            .archive
            .archive(final_elapsed, laps, Local::now())
            .cloned();

        if let Some(session) = &archived {
            info!(
                id = %session.id,
                total_ms = session.total_time,
                laps = session.laps.len(),
                "session archived"
            );
            self.events.push(EngineEvent::SessionArchived {
                id: session.id.clone(),
                total_ms: session.total_time,
                lap_count: session.laps.len(),
            });
        }

        self.timer.reset();
        self.goal.on_reset();
        self.last_checkpoint_ms = 0;
        self.persist();
        archived
    }

    /// Set the goal from user-entered seconds. Text that is not a positive
    /// number clears the goal.
    pub fn set_goal(&mut self, seconds_text: &str) -> Option<u64> {
        self.reconcile_unreadable();
        self.persistence.release(GOAL_KEY);
        let goal = self.goal.set_goal_from_text(seconds_text);
        debug!(goal_ms = ?goal, "goal updated");
        self.persist();
        goal
    }

    pub fn set_goal_ms(&mut self, goal_ms: u64) {
        self.reconcile_unreadable();
        self.persistence.release(GOAL_KEY);
        self.goal.set_goal_ms(goal_ms);
        self.persist();
    }

    pub fn clear_history(&mut self) {
        self.reconcile_unreadable();
        // an explicit clear also covers history the store could not read
        self.persistence.release(SESSIONS_KEY);
        let dropped = self.archive.len();
        self.archive.clear_all();
        info!(sessions = dropped, "history cleared");
        self.events.push(EngineEvent::HistoryCleared);
        self.persist();
    }

    /// Write the full state now, e.g. right before exiting
    pub fn flush(&mut self) {
        self.persist();
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.sample(self.clock.now_ms())
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Whether a reset would change anything
    pub fn can_reset(&self) -> bool {
        self.timer.is_running() || self.elapsed_ms() > 0 || !self.laps.is_empty()
    }

    /// Laps of the current run, chronological
    pub fn laps(&self) -> &[Lap] {
        self.laps.laps()
    }

    pub fn laps_recent_first(&self) -> impl Iterator<Item = &Lap> + '_ {
        self.laps.recent_first()
    }

    pub fn lap_rank(&self, lap: &Lap) -> LapRank {
        self.laps.rank(lap)
    }

    pub fn lap_summary(&self) -> LapSummary {
        self.laps.summary()
    }

    /// Archived sessions, most recent first
    pub fn sessions(&self) -> &[Session] {
        self.archive.sessions()
    }

    pub fn archive(&self) -> &SessionArchive {
        &self.archive
    }

    pub fn goal_ms(&self) -> Option<u64> {
        self.goal.goal_ms()
    }

    pub fn goal_reached(&self) -> bool {
        self.goal.is_reached()
    }

    pub fn goal_progress(&self) -> f64 {
        self.goal.progress(self.elapsed_ms())
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tick_scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    fn check_goal(&mut self, elapsed_ms: u64) {
        if self.goal.check_tick(elapsed_ms) {
            if let Some(goal_ms) = self.goal.goal_ms() {
                info!(goal_ms, elapsed_ms, "goal reached");
                self.events.push(EngineEvent::GoalReached {
                    goal_ms,
                    elapsed_ms,
                });
            }
        }
    }

    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            time: self.elapsed_ms(),
            laps: self.laps.laps().to_vec(),
            is_running: self.timer.is_running(),
        }
    }

    fn adopt_snapshot(&mut self, snapshot: TimerSnapshot) {
        let now = self.clock.now_ms();
        let mut timer = TimerEngine::new();
        if snapshot.is_running {
            timer.resume_from(snapshot.time, now);
        } else {
            timer.restore_paused(snapshot.time);
        }

        // a run that already passed its goal before the restart stays quiet
        self.goal.check_tick(snapshot.time);
        self.ticks = timer.is_running().then(|| self.scheduler.subscribe());
        info!(
            elapsed_ms = snapshot.time,
            running = snapshot.is_running,
            laps = snapshot.laps.len(),
            "stopwatch restored"
        );

        self.timer = timer;
        self.laps = LapRecorder::from_laps(snapshot.laps);
        self.last_checkpoint_ms = snapshot.time;
    }

    /// Retry keys that failed to read at startup and fold whatever comes
    /// back into the live state. Sessions merge behind newer ones; a stored
    /// goal or timer only applies if nothing replaced it in the meantime.
    /// Runs before every mutation so the mutation sees the merged state.
    fn reconcile_unreadable(&mut self) {
        if !self.persistence.has_held() {
            return;
        }

        if self.persistence.is_held(SESSIONS_KEY) {
            if let Restored::Loaded(stored) = self.persistence.reload_sessions() {
                info!(sessions = stored.len(), "stored history readable again");
                self.archive.append_older(stored);
            }
        }
        if self.persistence.is_held(GOAL_KEY) {
            if let Restored::Loaded(goal_ms) = self.persistence.reload_goal() {
                if self.goal.goal_ms().is_none() {
                    let elapsed = self.elapsed_ms();
                    self.goal = GoalTracker::with_goal_ms(Some(goal_ms));
                    self.goal.check_tick(elapsed);
                }
            }
        }
        if self.persistence.is_held(STATE_KEY) {
            if let Restored::Loaded(snapshot) = self.persistence.reload_timer() {
                if !self.can_reset() {
                    self.adopt_snapshot(snapshot);
                }
            }
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        let report =
            self.persistence
                .save_all(&snapshot, self.archive.sessions(), self.goal.goal_ms());
        for failure in &report.failures {
            warn!(key = failure.key(), error = %failure, "failed to persist stopwatch state");
        }
        for key in &report.skipped {
            debug!(key, "left unreadable state untouched");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::persist::RecoveryPolicy;
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn engine_with(
        clock: &ManualClock,
        store: MemoryStore,
    ) -> StopwatchEngine<ManualClock, MemoryStore> {
        StopwatchEngine::restore(
            clock.clone(),
            Persistence::new(store, RecoveryPolicy::Isolated),
            TickScheduler::new(Duration::from_millis(10)),
            EngineOptions::default(),
        )
    }

    fn engine() -> (ManualClock, StopwatchEngine<ManualClock, MemoryStore>) {
        let clock = ManualClock::new(1_000_000);
        let engine = engine_with(&clock, MemoryStore::new());
        (clock, engine)
    }

    #[test]
    fn test_lap_and_reset_scenario() {
        let (clock, mut sw) = engine();
        sw.start();

        clock.advance(1_500);
        let first = sw.record_lap().unwrap();
        assert_eq!((first.number, first.lap_time, first.total_time), (1, 1_500, 1_500));

        clock.advance(2_700);
        let second = sw.record_lap().unwrap();
        assert_eq!((second.number, second.lap_time, second.total_time), (2, 2_700, 4_200));

        let session = sw.reset_and_archive().unwrap();
        assert_eq!(session.total_time, 4_200);
        assert_eq!(session.laps, vec![first, second]);
        assert!(sw.laps().is_empty());
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.is_running());
        assert_eq!(sw.sessions().len(), 1);

        assert_matches!(
            sw.drain_events().as_slice(),
            [EngineEvent::SessionArchived { total_ms: 4_200, lap_count: 2, .. }]
        );
    }

    #[test]
    fn test_lap_while_stopped_is_ignored() {
        let (clock, mut sw) = engine();
        assert_eq!(sw.record_lap(), None);

        sw.start();
        clock.advance(100);
        sw.record_lap();
        sw.stop();
        clock.advance(100);
        assert_eq!(sw.record_lap(), None);
        assert_eq!(sw.laps().len(), 1);
    }

    #[test]
    fn test_pause_resume_preserves_elapsed() {
        let (clock, mut sw) = engine();
        sw.start();
        for _ in 0..3 {
            clock.advance(333);
            let before = sw.elapsed_ms();
            sw.stop();
            clock.advance(60_000);
            sw.start();
            assert_eq!(sw.elapsed_ms(), before);
        }
        assert_eq!(sw.elapsed_ms(), 999);
    }

    #[test]
    fn test_start_or_stop_toggles() {
        let (clock, mut sw) = engine();
        assert!(sw.start_or_stop());
        clock.advance(10);
        assert!(!sw.start_or_stop());
        assert_eq!(sw.elapsed_ms(), 10);
    }

    #[test]
    fn test_reset_twice_archives_once() {
        let (clock, mut sw) = engine();
        sw.start();
        clock.advance(500);

        assert!(sw.reset_and_archive().is_some());
        assert!(sw.reset_and_archive().is_none());
        assert_eq!(sw.sessions().len(), 1);
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.can_reset());
    }

    #[test]
    fn test_reset_without_activity_archives_nothing() {
        let (_clock, mut sw) = engine();
        sw.start();
        assert!(sw.reset_and_archive().is_none());
        assert!(sw.sessions().is_empty());
    }

    #[test]
    fn test_goal_fires_once_per_run() {
        let (clock, mut sw) = engine();
        assert_eq!(sw.set_goal("60"), Some(60_000));
        sw.start();

        clock.advance(59_990);
        sw.tick();
        assert!(sw.drain_events().is_empty());

        clock.advance(20);
        sw.tick();
        assert_eq!(
            sw.drain_events(),
            vec![EngineEvent::GoalReached {
                goal_ms: 60_000,
                elapsed_ms: 60_010
            }]
        );

        for _ in 0..10 {
            clock.advance(1_000);
            sw.tick();
        }
        assert!(sw.drain_events().is_empty());

        // a restart after the goal was reached notifies on its next tick
        sw.stop();
        sw.start();
        assert!(!sw.goal_reached());
        clock.advance(10);
        sw.tick();
        assert_eq!(
            sw.drain_events(),
            vec![EngineEvent::GoalReached {
                goal_ms: 60_000,
                elapsed_ms: 70_020
            }]
        );
        clock.advance(1_000);
        sw.tick();
        assert!(sw.drain_events().is_empty());

        // a new run can fire again
        sw.reset_and_archive();
        sw.drain_events();
        sw.start();
        clock.advance(60_000);
        sw.tick();
        assert_matches!(sw.drain_events().as_slice(), [EngineEvent::GoalReached { .. }]);
    }

    #[test]
    fn test_goal_survives_reset_and_progress() {
        let (clock, mut sw) = engine();
        sw.set_goal("10");
        assert_eq!(sw.goal_progress(), 0.0);

        sw.start();
        clock.advance(2_500);
        assert_eq!(sw.goal_progress(), 0.25);

        sw.reset_and_archive();
        assert_eq!(sw.goal_ms(), Some(10_000));
        assert!(!sw.goal_reached());

        sw.set_goal("nope");
        assert_eq!(sw.goal_ms(), None);
        assert_eq!(sw.goal_progress(), 0.0);
    }

    #[test]
    fn test_ticks_only_while_running() {
        let (clock, mut sw) = engine();
        assert!(!sw.tick_scheduler().is_active());
        assert_eq!(sw.tick(), None);

        sw.start();
        assert!(sw.tick_scheduler().is_active());
        clock.advance(25);
        assert_eq!(sw.tick(), Some(25));

        sw.stop();
        assert!(!sw.tick_scheduler().is_active());

        sw.start();
        sw.reset_and_archive();
        assert!(!sw.tick_scheduler().is_active());

        sw.start();
        let scheduler = sw.tick_scheduler().clone();
        drop(sw);
        assert!(!scheduler.is_active());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (clock, mut sw) = engine();
        sw.start();
        assert!(sw.persistence().store().raw(STATE_KEY).unwrap().contains(r#""isRunning":true"#));

        clock.advance(1_500);
        sw.record_lap();
        assert!(sw.persistence().store().raw(STATE_KEY).unwrap().contains(r#""totalTime":1500"#));

        sw.set_goal("30");
        assert_eq!(sw.persistence().store().raw(GOAL_KEY), Some("30000"));

        sw.reset_and_archive();
        assert!(sw.persistence().store().contains(SESSIONS_KEY));

        sw.clear_history();
        assert!(!sw.persistence().store().contains(SESSIONS_KEY));
        assert_eq!(sw.drain_events().last(), Some(&EngineEvent::HistoryCleared));
    }

    #[test]
    fn test_checkpoint_while_running() {
        let (clock, mut sw) = engine();
        sw.start();
        clock.advance(400);
        sw.tick();
        assert!(sw.persistence().store().raw(STATE_KEY).unwrap().contains(r#""time":0"#));

        clock.advance(700);
        sw.tick();
        assert!(sw.persistence().store().raw(STATE_KEY).unwrap().contains(r#""time":1100"#));
    }

    #[test]
    fn test_store_failure_keeps_memory_state() {
        let (clock, mut sw) = engine();
        sw.persistence_mut().store_mut().fail_writes_for(STATE_KEY);

        sw.start();
        clock.advance(300);
        sw.set_goal("5");
        assert!(sw.is_running());
        assert_eq!(sw.elapsed_ms(), 300);
        assert_eq!(sw.persistence().store().raw(GOAL_KEY), Some("5000"));
        assert!(!sw.persistence().store().contains(STATE_KEY));
    }

    #[test]
    fn test_restore_running_continues() {
        let (clock, mut sw) = engine();
        sw.start();
        clock.advance(2_000);
        sw.record_lap();
        let store = sw.persistence().store().clone();
        drop(sw);

        // downtime while the process is gone is not counted
        clock.advance(50_000);
        let mut restored = engine_with(&clock, store);
        assert!(restored.is_running());
        assert!(restored.tick_scheduler().is_active());
        assert_eq!(restored.elapsed_ms(), 2_000);
        assert_eq!(restored.laps().len(), 1);

        clock.advance(300);
        restored.tick();
        assert_eq!(restored.elapsed_ms(), 2_300);
        let lap = restored.record_lap().unwrap();
        assert_eq!((lap.number, lap.lap_time, lap.total_time), (2, 300, 2_300));
    }

    #[test]
    fn test_restore_reports_recovery() {
        let store = MemoryStore::new()
            .with_entry(STATE_KEY, "garbage")
            .with_entry(GOAL_KEY, "45000");
        let clock = ManualClock::new(1_000_000);
        let mut sw = engine_with(&clock, store);

        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_ms(), 0);
        assert_eq!(sw.goal_ms(), Some(45_000));
        assert_matches!(
            sw.drain_events().as_slice(),
            [EngineEvent::StateRecovered { key: STATE_KEY, .. }]
        );
    }

    #[test]
    fn test_restore_past_goal_does_not_refire() {
        let store = MemoryStore::new()
            .with_entry(STATE_KEY, r#"{"time":90000,"laps":[],"isRunning":true}"#)
            .with_entry(GOAL_KEY, "60000");
        let clock = ManualClock::new(1_000_000);
        let mut sw = engine_with(&clock, store);
        clock.advance(10);
        sw.tick();
        assert!(sw.drain_events().is_empty());
        assert!(sw.goal_reached());
    }

    fn stored_history() -> String {
        let older = Session {
            id: "1700000000000-0000abcd".to_string(),
            date: "2026-10-17 08:00:00".to_string(),
            total_time: 7_000,
            laps: Vec::new(),
        };
        serde_json::to_string(&[older]).unwrap()
    }

    #[test]
    fn test_unreadable_history_survives_until_readable() {
        let history = stored_history();
        let mut store = MemoryStore::new().with_entry(SESSIONS_KEY, &history);
        store.fail_reads_for(SESSIONS_KEY);
        let clock = ManualClock::new(1_000_000);
        let mut sw = engine_with(&clock, store);

        assert_matches!(
            sw.drain_events().as_slice(),
            [EngineEvent::StateUnreadable { key: SESSIONS_KEY, .. }]
        );
        assert!(sw.sessions().is_empty());

        // saves while the key is unreadable leave it alone
        sw.start();
        clock.advance(1_500);
        sw.tick();
        assert_eq!(
            sw.persistence().store().raw(SESSIONS_KEY),
            Some(history.as_str())
        );
        assert!(sw.persistence().store().contains(STATE_KEY));

        sw.persistence_mut().store_mut().heal();
        clock.advance(500);
        sw.reset_and_archive();
        let totals: Vec<u64> = sw.sessions().iter().map(|s| s.total_time).collect();
        assert_eq!(totals, vec![2_000, 7_000]);
        assert!(!sw.persistence().is_held(SESSIONS_KEY));

        let stored = sw.persistence_mut().reload_sessions().unwrap_or_default();
        assert_eq!(stored, sw.sessions());
    }

    #[test]
    fn test_clear_history_overrides_unreadable_history() {
        let mut store = MemoryStore::new().with_entry(SESSIONS_KEY, &stored_history());
        store.fail_reads_for(SESSIONS_KEY);
        let clock = ManualClock::new(1_000_000);
        let mut sw = engine_with(&clock, store);

        sw.clear_history();
        assert!(!sw.persistence().store().contains(SESSIONS_KEY));
        assert!(!sw.persistence().is_held(SESSIONS_KEY));
    }

    #[test]
    fn test_unreadable_goal_is_adopted_when_readable() {
        let mut store = MemoryStore::new().with_entry(GOAL_KEY, "30000");
        store.fail_reads_for(GOAL_KEY);
        let clock = ManualClock::new(1_000_000);
        let mut sw = engine_with(&clock, store);
        assert_eq!(sw.goal_ms(), None);

        sw.start();
        assert_eq!(sw.persistence().store().raw(GOAL_KEY), Some("30000"));

        sw.persistence_mut().store_mut().heal();
        sw.stop();
        assert_eq!(sw.goal_ms(), Some(30_000));
        assert_eq!(sw.persistence().store().raw(GOAL_KEY), Some("30000"));
    }
}
