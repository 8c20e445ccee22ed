use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::error::LapError;
use crate::util::{mean_ms, std_dev_ms};

/// A recorded split.
///
/// `total_time` is the elapsed time when the lap was taken and `lap_time` the
/// distance to the previous lap's total (or to zero for the first lap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub number: u32,
    pub lap_time: u64,
    pub total_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapRank {
    Fastest,
    Slowest,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapSummary {
    pub count: usize,
    pub fastest_ms: Option<u64>,
    pub slowest_ms: Option<u64>,
    pub mean_ms: Option<f64>,
    pub std_dev_ms: Option<f64>,
}

/// Laps of the current run, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LapRecorder {
    laps: Vec<Lap>,
}

impl LapRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously validated lap list
    pub fn from_laps(laps: Vec<Lap>) -> Self {
        Self { laps }
    }

    /// Append a lap at `total_ms`.
    ///
    /// Returns `None` without recording when `total_ms` does not move past the
    /// previous lap, which keeps totals strictly increasing.
    pub fn record(&mut self, total_ms: u64) -> Option<Lap> {
        let previous_total = self.last_total_ms();
        if total_ms <= previous_total {
            return None;
        }

        let lap = Lap {
            number: self.laps.len() as u32 + 1,
            lap_time: total_ms - previous_total,
            total_time: total_ms,
        };
        self.laps.push(lap);
        Some(lap)
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn recent_first(&self) -> impl Iterator<Item = &Lap> + '_ {
        self.laps.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    pub fn last_total_ms(&self) -> u64 {
        self.laps.last().map_or(0, |lap| lap.total_time)
    }

    fn lap_time_bounds(&self) -> Option<(u64, u64)> {
        if self.laps.len() < 2 {
            return None;
        }
        match self.laps.iter().map(|lap| lap.lap_time).minmax() {
            MinMaxResult::MinMax(min, max) => Some((min, max)),
            MinMaxResult::OneElement(only) => Some((only, only)),
            MinMaxResult::NoElements => None,
        }
    }

    /// Shortest split, only once there are two laps to compare
    pub fn fastest(&self) -> Option<u64> {
        self.lap_time_bounds().map(|(min, _)| min)
    }

    pub fn slowest(&self) -> Option<u64> {
        self.lap_time_bounds().map(|(_, max)| max)
    }

    /// When every lap ties, the laps count as fastest.
    pub fn rank(&self, lap: &Lap) -> LapRank {
        match self.lap_time_bounds() {
            Some((min, _)) if lap.lap_time == min => LapRank::Fastest,
            Some((_, max)) if lap.lap_time == max => LapRank::Slowest,
            _ => LapRank::Normal,
        }
    }

    pub fn summary(&self) -> LapSummary {
        let times = self.laps.iter().map(|lap| lap.lap_time).collect::<Vec<u64>>();
        LapSummary {
            count: self.laps.len(),
            fastest_ms: self.fastest(),
            slowest_ms: self.slowest(),
            mean_ms: mean_ms(&times),
            std_dev_ms: std_dev_ms(&times),
        }
    }

    pub fn clear(&mut self) {
        self.laps.clear();
    }

    /// Move the laps out, leaving the recorder empty
    pub fn take(&mut self) -> Vec<Lap> {
        std::mem::take(&mut self.laps)
    }
}

/// Check that `laps` is a well-formed chronological lap sequence
pub fn validate(laps: &[Lap]) -> Result<(), LapError> {
    let mut previous_ms = 0;
    for (index, lap) in laps.iter().enumerate() {
        let expected = index as u32 + 1;
        if lap.number != expected {
            return Err(LapError::OutOfSequence {
                index,
                expected,
                found: lap.number,
            });
        }
        if lap.total_time <= previous_ms {
            return Err(LapError::NotIncreasing {
                number: lap.number,
                total_ms: lap.total_time,
                previous_ms,
            });
        }
        if lap.lap_time != lap.total_time - previous_ms {
            return Err(LapError::SplitMismatch {
                number: lap.number,
                lap_ms: lap.lap_time,
            });
        }
        previous_ms = lap.total_time;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn lap(number: u32, lap_time: u64, total_time: u64) -> Lap {
        Lap {
            number,
            lap_time,
            total_time,
        }
    }

    #[test]
    fn test_record_computes_splits() {
        let mut recorder = LapRecorder::new();
        assert_eq!(recorder.record(1_500), Some(lap(1, 1_500, 1_500)));
        assert_eq!(recorder.record(4_200), Some(lap(2, 2_700, 4_200)));
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.last_total_ms(), 4_200);
    }

    #[test]
    fn test_splits_sum_to_last_total() {
        let mut recorder = LapRecorder::new();
        for total in [120, 480, 481, 2_000, 2_950, 10_000] {
            recorder.record(total);
        }
        let sum: u64 = recorder.laps().iter().map(|l| l.lap_time).sum();
        assert_eq!(sum, recorder.last_total_ms());
        assert!(recorder
            .laps()
            .windows(2)
            .all(|w| w[0].total_time < w[1].total_time && w[0].number + 1 == w[1].number));
        assert_eq!(validate(recorder.laps()), Ok(()));
    }

    #[test]
    fn test_zero_length_lap_is_ignored() {
        let mut recorder = LapRecorder::new();
        assert_eq!(recorder.record(0), None);
        recorder.record(1_000);
        assert_eq!(recorder.record(1_000), None);
        assert_eq!(recorder.record(999), None);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_recent_first_order() {
        let mut recorder = LapRecorder::new();
        recorder.record(100);
        recorder.record(300);
        recorder.record(600);
        let numbers: Vec<u32> = recorder.recent_first().map(|l| l.number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        // canonical order stays chronological
        assert_eq!(recorder.laps()[0].number, 1);
    }

    #[test]
    fn test_fastest_slowest_need_two_laps() {
        let mut recorder = LapRecorder::new();
        assert_eq!(recorder.fastest(), None);

        recorder.record(1_000);
        assert_eq!(recorder.fastest(), None);
        assert_eq!(recorder.slowest(), None);
        assert_eq!(recorder.rank(&recorder.laps()[0]), LapRank::Normal);

        recorder.record(1_400);
        recorder.record(3_400);
        assert_eq!(recorder.fastest(), Some(400));
        assert_eq!(recorder.slowest(), Some(2_000));

        let laps = recorder.laps().to_vec();
        assert_eq!(recorder.rank(&laps[0]), LapRank::Normal);
        assert_eq!(recorder.rank(&laps[1]), LapRank::Fastest);
        assert_eq!(recorder.rank(&laps[2]), LapRank::Slowest);
    }

    #[test]
    fn test_rank_ties_prefer_fastest() {
        let mut recorder = LapRecorder::new();
        recorder.record(500);
        recorder.record(1_000);
        let laps = recorder.laps().to_vec();
        assert!(laps.iter().all(|l| recorder.rank(l) == LapRank::Fastest));
    }

    #[test]
    fn test_summary() {
        let mut recorder = LapRecorder::new();
        recorder.record(1_500);
        recorder.record(4_200);
        let summary = recorder.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.fastest_ms, Some(1_500));
        assert_eq!(summary.slowest_ms, Some(2_700));
        assert_eq!(summary.mean_ms, Some(2_100.0));
        assert_eq!(summary.std_dev_ms, Some(600.0));
    }

    #[test]
    fn test_take_and_clear() {
        let mut recorder = LapRecorder::new();
        recorder.record(10);
        recorder.record(20);
        let taken = recorder.take();
        assert_eq!(taken.len(), 2);
        assert!(recorder.is_empty());

        recorder.record(5);
        recorder.clear();
        assert!(recorder.is_empty());
        // numbering restarts for the next run
        assert_eq!(recorder.record(7).map(|l| l.number), Some(1));
    }

    #[test]
    fn test_validate_rejects_bad_sequences() {
        assert_matches!(
            validate(&[lap(2, 100, 100)]),
            Err(LapError::OutOfSequence { expected: 1, found: 2, .. })
        );
        assert_matches!(
            validate(&[lap(1, 100, 100), lap(2, 0, 100)]),
            Err(LapError::NotIncreasing { number: 2, .. })
        );
        assert_matches!(
            validate(&[lap(1, 100, 100), lap(2, 50, 300)]),
            Err(LapError::SplitMismatch { number: 2, .. })
        );
        assert_eq!(validate(&[]), Ok(()));
    }

    #[test]
    fn test_lap_serializes_camel_case() {
        let json = serde_json::to_string(&lap(1, 1_500, 1_500)).unwrap();
        assert_eq!(json, r#"{"number":1,"lapTime":1500,"totalTime":1500}"#);
    }
}
