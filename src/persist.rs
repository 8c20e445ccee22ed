//! Mirrors stopwatch state into a [`KeyValueStore`] and restores it.
//!
//! State lives in three independent blobs:
//!
//! - `stopwatchState`: `{ "time", "laps", "isRunning" }`
//! - `stopwatchSessions`: array of sessions, newest first, only when non-empty
//! - `stopwatchGoal`: goal in milliseconds as a decimal string
//!
//! Each blob is written and read on its own, so a failed write or a corrupted
//! value only costs that one key. A key whose read failed is held: it is
//! never written or removed until a later read of it succeeds.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistError;
use crate::laps::{self, Lap};
use crate::session::Session;
use crate::store::KeyValueStore;

pub const STATE_KEY: &str = "stopwatchState";
pub const SESSIONS_KEY: &str = "stopwatchSessions";
pub const GOAL_KEY: &str = "stopwatchGoal";

/// Largest elapsed time the timer can represent
pub const MAX_ELAPSED_MS: u64 = i64::MAX as u64;

/// Serialized form of the timer and its laps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub time: u64,
    pub laps: Vec<Lap>,
    pub is_running: bool,
}

/// Outcome of reading one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored<T> {
    Loaded(T),
    Absent,
    /// The stored value was unusable and has been discarded
    Recovered { reason: String },
    /// The store failed to read the key; its value is left in place
    Unreadable { reason: String },
}

impl<T> Restored<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Restored::Loaded(value) => Some(value),
            Restored::Absent | Restored::Recovered { .. } | Restored::Unreadable { .. } => None,
        }
    }

    pub fn recovery_reason(&self) -> Option<&str> {
        match self {
            Restored::Recovered { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn unreadable_reason(&self) -> Option<&str> {
        match self {
            Restored::Unreadable { reason } => Some(reason),
            _ => None,
        }
    }
}

impl<T: Default> Restored<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

/// What to throw away when the primary timer blob is corrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryPolicy {
    /// Only the corrupted key is dropped
    #[default]
    Isolated,
    /// A corrupted timer blob wipes sessions and goal too
    WipeAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredState {
    pub timer: Restored<TimerSnapshot>,
    pub sessions: Restored<Vec<Session>>,
    pub goal: Restored<u64>,
}

impl RestoredState {
    /// `(key, reason)` for every key that had to be discarded
    pub fn recoveries(&self) -> Vec<(&'static str, String)> {
        [
            (STATE_KEY, self.timer.recovery_reason()),
            (SESSIONS_KEY, self.sessions.recovery_reason()),
            (GOAL_KEY, self.goal.recovery_reason()),
        ]
        .into_iter()
        .filter_map(|(key, reason)| reason.map(|r| (key, r.to_string())))
        .collect()
    }

    /// `(key, reason)` for every key the store failed to read
    pub fn unreadable(&self) -> Vec<(&'static str, String)> {
        [
            (STATE_KEY, self.timer.unreadable_reason()),
            (SESSIONS_KEY, self.sessions.unreadable_reason()),
            (GOAL_KEY, self.goal.unreadable_reason()),
        ]
        .into_iter()
        .filter_map(|(key, reason)| reason.map(|r| (key, r.to_string())))
        .collect()
    }
}

/// Failures from a [`Persistence::save_all`]; empty means everything landed.
/// Held keys are listed in `skipped` rather than counted as failures.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub failures: Vec<PersistError>,
    pub skipped: Vec<&'static str>,
}

impl SaveReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
    policy: RecoveryPolicy,
    held: Vec<&'static str>,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, policy: RecoveryPolicy) -> Self {
        Self {
            store,
            policy,
            held: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn policy(&self) -> RecoveryPolicy {
        self.policy
    }

    /// Whether `key` failed to read and is protected from writes
    pub fn is_held(&self, key: &str) -> bool {
        self.held.iter().any(|held| *held == key)
    }

    pub fn has_held(&self) -> bool {
        !self.held.is_empty()
    }

    /// Allow writes to a held key again, giving up on its stored value
    pub fn release(&mut self, key: &str) {
        self.held.retain(|held| *held != key);
    }

    pub fn save_timer(&mut self, snapshot: &TimerSnapshot) -> Result<(), PersistError> {
        let json = serde_json::to_string(snapshot).map_err(|source| PersistError::Serialize {
            key: STATE_KEY,
            source,
        })?;
        self.write(STATE_KEY, &json)
    }

    /// An empty history removes the key rather than storing `[]`
    pub fn save_sessions(&mut self, sessions: &[Session]) -> Result<(), PersistError> {
        if sessions.is_empty() {
            return self.erase(SESSIONS_KEY);
        }
        let json = serde_json::to_string(sessions).map_err(|source| PersistError::Serialize {
            key: SESSIONS_KEY,
            source,
        })?;
        self.write(SESSIONS_KEY, &json)
    }

    pub fn save_goal(&mut self, goal_ms: Option<u64>) -> Result<(), PersistError> {
        match goal_ms {
            Some(ms) => self.write(GOAL_KEY, &ms.to_string()),
            None => self.erase(GOAL_KEY),
        }
    }

    /// Write all three keys. Each write is attempted regardless of how the
    /// others went.
    pub fn save_all(
        &mut self,
        snapshot: &TimerSnapshot,
        sessions: &[Session],
        goal_ms: Option<u64>,
    ) -> SaveReport {
        let results = [
            self.save_timer(snapshot),
            self.save_sessions(sessions),
            self.save_goal(goal_ms),
        ];
        let mut report = SaveReport::default();
        for err in results.into_iter().filter_map(Result::err) {
            match err {
                PersistError::Held { key } => report.skipped.push(key),
                err => report.failures.push(err),
            }
        }
        report
    }

    /// Read back every key. Never fails: unusable values come back as
    /// [`Restored::Recovered`] and are removed from the store; keys the store
    /// could not read come back as [`Restored::Unreadable`] and are held.
    pub fn load(&mut self) -> RestoredState {
        let timer = self.reload_timer();
        let mut sessions = self.reload_sessions();
        let mut goal = self.reload_goal();

        if self.policy == RecoveryPolicy::WipeAll {
            if let Some(reason) = timer.recovery_reason() {
                warn!(%reason, "timer state corrupted, wiping all stored state");
                if matches!(sessions, Restored::Loaded(_)) {
                    self.discard(SESSIONS_KEY);
                    sessions = wiped();
                }
                if matches!(goal, Restored::Loaded(_)) {
                    self.discard(GOAL_KEY);
                    goal = wiped();
                }
            }
        }

        RestoredState {
            timer,
            sessions,
            goal,
        }
    }

    pub fn reload_timer(&mut self) -> Restored<TimerSnapshot> {
        self.read_key(STATE_KEY, parse_timer)
    }

    pub fn reload_sessions(&mut self) -> Restored<Vec<Session>> {
        self.read_key(SESSIONS_KEY, parse_sessions)
    }

    pub fn reload_goal(&mut self) -> Restored<u64> {
        self.read_key(GOAL_KEY, parse_goal)
    }

    fn read_key<T>(
        &mut self,
        key: &'static str,
        parse: fn(&str) -> Result<T, String>,
    ) -> Restored<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => {
                self.held.retain(|held| *held != key);
                match raw {
                    Some(raw) => raw,
                    None => return Restored::Absent,
                }
            }
            Err(err) => {
                // the value may still be fine, so it must not be overwritten
                warn!(key, error = %err, "failed to read stored state, holding key");
                if !self.is_held(key) {
                    self.held.push(key);
                }
                return Restored::Unreadable {
                    reason: err.to_string(),
                };
            }
        };

        match parse(&raw) {
            Ok(value) => {
                debug!(key, "restored stored state");
                Restored::Loaded(value)
            }
            Err(reason) => {
                warn!(key, %reason, "discarding corrupted stored state");
                self.discard(key);
                Restored::Recovered { reason }
            }
        }
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), PersistError> {
        if self.is_held(key) {
            return Err(PersistError::Held { key });
        }
        self.store
            .set(key, value)
            .map_err(|source| PersistError::Write { key, source })
    }

    fn erase(&mut self, key: &'static str) -> Result<(), PersistError> {
        if self.is_held(key) {
            return Err(PersistError::Held { key });
        }
        self.store
            .remove(key)
            .map_err(|source| PersistError::Write { key, source })
    }

    fn discard(&mut self, key: &'static str) {
        if let Err(err) = self.erase(key) {
            warn!(error = %err, "failed to remove discarded state");
        }
    }
}

fn wiped<T>() -> Restored<T> {
    Restored::Recovered {
        reason: format!("wiped because {STATE_KEY} was corrupted"),
    }
}

fn parse_timer(raw: &str) -> Result<TimerSnapshot, String> {
    let snapshot: TimerSnapshot = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if snapshot.time > MAX_ELAPSED_MS {
        return Err(format!("elapsed {}ms is out of range", snapshot.time));
    }
    laps::validate(&snapshot.laps).map_err(|e| e.to_string())?;
    if let Some(last) = snapshot.laps.last() {
        if last.total_time > snapshot.time {
            return Err(format!(
                "lap {} total {}ms is beyond elapsed {}ms",
                last.number, last.total_time, snapshot.time
            ));
        }
    }
    Ok(snapshot)
}

fn parse_sessions(raw: &str) -> Result<Vec<Session>, String> {
    let sessions: Vec<Session> = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    for session in &sessions {
        if session.total_time > MAX_ELAPSED_MS {
            return Err(format!("session {}: total is out of range", session.id));
        }
        laps::validate(&session.laps).map_err(|e| format!("session {}: {e}", session.id))?;
    }
    Ok(sessions)
}

fn parse_goal(raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        Ok(_) => Err("goal must be positive".to_string()),
        Err(e) => Err(format!("goal {raw:?} is not a number: {e}")),
    }
}
