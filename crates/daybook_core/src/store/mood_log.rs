//! Append-only mood history for the mood tracker.

use crate::model::mood::Mood;
use log::debug;

/// Per-mood tally over the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoodCounts {
    pub good: usize,
    pub neutral: usize,
    pub bad: usize,
}

/// Ordered record of moods chosen during a session.
#[derive(Debug, Clone, Default)]
pub struct MoodLog {
    history: Vec<Mood>,
}

impl MoodLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one mood and returns the updated history.
    pub fn record(&mut self, mood: Mood) -> &[Mood] {
        self.history.push(mood);
        debug!(
            "event=mood_record module=mood_log status=ok history_len={}",
            self.history.len()
        );
        &self.history
    }

    pub fn history(&self) -> &[Mood] {
        &self.history
    }

    pub fn counts(&self) -> MoodCounts {
        self.history
            .iter()
            .fold(MoodCounts::default(), |mut counts, mood| {
                match mood {
                    Mood::Good => counts.good += 1,
                    Mood::Neutral => counts.neutral += 1,
                    Mood::Bad => counts.bad += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{MoodCounts, MoodLog};
    use crate::model::mood::Mood;

    #[test]
    fn record_preserves_order_and_counts() {
        let mut log = MoodLog::new();
        log.record(Mood::Good);
        log.record(Mood::Bad);
        let history = log.record(Mood::Good);
        assert_eq!(history, &[Mood::Good, Mood::Bad, Mood::Good]);
        assert_eq!(
            log.counts(),
            MoodCounts {
                good: 2,
                neutral: 0,
                bad: 1,
            }
        );
    }
}
