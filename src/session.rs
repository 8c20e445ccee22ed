use std::io;

use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::format::format_time;
use crate::laps::Lap;

/// An archived run. Never changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub date: String,
    pub total_time: u64,
    pub laps: Vec<Lap>,
}

/// History of finished runs, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionArchive {
    sessions: Vec<Session>,
}

impl SessionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    /// Archive a finished run if it had any activity.
    ///
    /// `laps` must be chronological. Returns the new session, which is now at
    /// the front of the history.
    pub fn archive(
        &mut self,
        final_elapsed_ms: u64,
        laps: Vec<Lap>,
        now: DateTime<Local>,
    ) -> Option<&Session> {
        if final_elapsed_ms == 0 && laps.is_empty() {
            return None;
        }

        let session = Session {
            id: new_session_id(&now),
            date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            total_time: final_elapsed_ms,
            laps,
        };
        self.sessions.insert(0, session);
        self.sessions.first()
    }

    /// Put sessions archived before this history was loaded behind it,
    /// skipping ids already present
    pub fn append_older(&mut self, older: Vec<Session>) {
        for session in older {
            if !self.sessions.iter().any(|s| s.id == session.id) {
                self.sessions.push(session);
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.sessions.clear();
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn total_tracked_ms(&self) -> u64 {
        self.sessions
            .iter()
            .fold(0u64, |total, s| total.saturating_add(s.total_time))
    }

    pub fn longest(&self) -> Option<&Session> {
        self.sessions.iter().max_by_key(|s| s.total_time)
    }

    /// Write the history as CSV, one row per session, newest first
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["id", "date", "total", "total_ms", "laps"])?;
        for session in &self.sessions {
            wtr.write_record([
                session.id.as_str(),
                session.date.as_str(),
                format_time(session.total_time).as_str(),
                session.total_time.to_string().as_str(),
                session.laps.len().to_string().as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Millisecond timestamp plus a random suffix; unique enough for one user
/// archiving by hand.
fn new_session_id(now: &DateTime<Local>) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}-{:08x}", now.timestamp_millis(), suffix)
}
