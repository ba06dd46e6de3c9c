use unicode_width::UnicodeWidthStr;

use crate::score::{FinalScore, TEST_SECONDS};
use crate::session::{Outcome, SessionEvent, WordLayout};

pub const IDLE_HINT: &str = "Start typing to start the test";
pub const RUNNING_HINT: &str = "Keep typing...";
pub const FINISHED_HINT: &str = "Time is up!";

/// Placeholder for the metric labels before anything was typed.
pub const EMPTY_METRIC: &str = "?";

pub const MIN_ZOOM: u16 = 1;
pub const MAX_ZOOM: u16 = 4;
pub const DEFAULT_ZOOM: u16 = 1;

/// Renderable session facts, fed exclusively by [`SessionEvent`]s. The
/// engine never reaches into widgets; this struct is the other end of
/// that message passing.
#[derive(Debug, Clone)]
pub struct DisplayState {
    /// Judgement mark per display word, `None` until a word was judged.
    pub marks: Vec<Option<Outcome>>,
    /// Display index of the word being typed.
    pub active: usize,
    /// Rows scrolled off the top of the word panel.
    pub scroll_rows: u16,
    pub hint: &'static str,
    pub wpm_text: String,
    pub cpm_text: String,
    pub timer_text: String,
    /// The in-progress keystroke buffer, echoed on the input line.
    pub buffer: String,
    /// Zoom step; higher zoom fits fewer words on a row.
    pub zoom: u16,
    pub restart_enabled: bool,
    pub final_score: Option<FinalScore>,
}

impl DisplayState {
    pub fn new(word_count: usize) -> Self {
        Self {
            marks: vec![None; word_count],
            active: 0,
            scroll_rows: 0,
            hint: IDLE_HINT,
            wpm_text: EMPTY_METRIC.to_string(),
            cpm_text: EMPTY_METRIC.to_string(),
            timer_text: TEST_SECONDS.to_string(),
            buffer: String::new(),
            zoom: DEFAULT_ZOOM,
            restart_enabled: true,
            final_score: None,
        }
    }

    pub fn apply_all(&mut self, events: &[SessionEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Started { remaining } => {
                self.hint = RUNNING_HINT;
                self.restart_enabled = false;
                self.timer_text = remaining.to_string();
            }
            SessionEvent::WordJudged { index, outcome } => {
                if let Some(mark) = self.marks.get_mut(*index) {
                    *mark = Some(*outcome);
                }
            }
            SessionEvent::ActiveWordChanged { index } => {
                self.active = *index;
            }
            SessionEvent::WordsRecycled => {
                self.marks.fill(None);
                self.scroll_rows = 0;
            }
            SessionEvent::MetricsUpdated { wpm, cpm } => {
                self.wpm_text = wpm.to_string();
                self.cpm_text = cpm.to_string();
            }
            SessionEvent::ScrollRequested => {
                self.scroll_rows = self.scroll_rows.saturating_add(1);
            }
            SessionEvent::TimerUpdated { remaining } => {
                self.timer_text = remaining.to_string();
            }
            SessionEvent::Finished(score) => {
                self.hint = FINISHED_HINT;
                self.restart_enabled = true;
                self.buffer.clear();
                self.wpm_text = score.wpm.to_string();
                self.cpm_text = score.score_text.clone();
                self.final_score = Some(score.clone());
            }
        }
    }

    /// Fit more words on a row.
    pub fn increase_density(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Fit fewer words on a row.
    pub fn decrease_density(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }
}

/// Word positions for one rendering width. Words flow left to right and
/// wrap; the zoom step shrinks the usable width. The engine consults the
/// row table through [`WordLayout`] to notice the active word wrapping.
#[derive(Debug, Clone)]
pub struct WordFlow {
    rows: Vec<u16>,
    row_count: u16,
}

impl WordFlow {
    pub fn new(words: &[String], width: u16, zoom: u16) -> Self {
        let usable = (width / zoom.max(1)).max(1);
        let mut rows = Vec::with_capacity(words.len());
        let mut row: u16 = 0;
        let mut col: u16 = 0;
        for word in words {
            let cell = word.width() as u16 + 1;
            if col > 0 && col + cell > usable {
                row += 1;
                col = 0;
            }
            rows.push(row);
            col += cell;
        }
        Self {
            row_count: rows.last().map(|r| r + 1).unwrap_or(0),
            rows,
        }
    }

    pub fn row_count(&self) -> u16 {
        self.row_count
    }

    pub fn rows(&self) -> &[u16] {
        &self.rows
    }
}

impl WordLayout for WordFlow {
    fn row_of(&self, index: usize) -> Option<u16> {
        self.rows.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Outcome;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_new_display_shows_idle_chrome() {
        let display = DisplayState::new(3);
        assert_eq!(display.marks, vec![None, None, None]);
        assert_eq!(display.hint, IDLE_HINT);
        assert_eq!(display.wpm_text, "?");
        assert_eq!(display.cpm_text, "?");
        assert_eq!(display.timer_text, "60");
        assert_eq!(display.zoom, DEFAULT_ZOOM);
        assert!(display.restart_enabled);
        assert!(display.final_score.is_none());
    }

    #[test]
    fn test_started_switches_hint_and_blocks_restart() {
        let mut display = DisplayState::new(2);
        display.apply(&SessionEvent::Started { remaining: 59 });

        assert_eq!(display.hint, RUNNING_HINT);
        assert_eq!(display.timer_text, "59");
        assert!(!display.restart_enabled);
    }

    #[test]
    fn test_judged_words_are_marked() {
        let mut display = DisplayState::new(3);
        display.apply(&SessionEvent::WordJudged {
            index: 0,
            outcome: Outcome::Correct,
        });
        display.apply(&SessionEvent::WordJudged {
            index: 2,
            outcome: Outcome::Incorrect,
        });

        assert_eq!(
            display.marks,
            vec![Some(Outcome::Correct), None, Some(Outcome::Incorrect)]
        );
    }

    #[test]
    fn test_mark_outside_the_list_is_ignored() {
        let mut display = DisplayState::new(1);
        display.apply(&SessionEvent::WordJudged {
            index: 9,
            outcome: Outcome::Correct,
        });
        assert_eq!(display.marks, vec![None]);
    }

    #[test]
    fn test_recycle_clears_marks_and_scroll() {
        let mut display = DisplayState::new(2);
        display.apply_all(&[
            SessionEvent::WordJudged {
                index: 0,
                outcome: Outcome::Correct,
            },
            SessionEvent::ScrollRequested,
            SessionEvent::WordsRecycled,
        ]);

        assert_eq!(display.marks, vec![None, None]);
        assert_eq!(display.scroll_rows, 0);
    }

    #[test]
    fn test_scroll_requests_accumulate() {
        let mut display = DisplayState::new(1);
        display.apply(&SessionEvent::ScrollRequested);
        display.apply(&SessionEvent::ScrollRequested);
        assert_eq!(display.scroll_rows, 2);
    }

    #[test]
    fn test_metrics_and_timer_update_labels() {
        let mut display = DisplayState::new(1);
        display.apply_all(&[
            SessionEvent::MetricsUpdated { wpm: 19, cpm: 95 },
            SessionEvent::TimerUpdated { remaining: 30 },
        ]);

        assert_eq!(display.wpm_text, "19");
        assert_eq!(display.cpm_text, "95");
        assert_eq!(display.timer_text, "30");
    }

    #[test]
    fn test_finished_locks_in_the_final_figures() {
        let mut display = DisplayState::new(1);
        display.buffer.push_str("halfway");
        let score = FinalScore::from_tallies(12, 0, 58, 0);
        display.apply(&SessionEvent::Finished(score.clone()));

        assert_eq!(display.hint, FINISHED_HINT);
        assert_eq!(display.wpm_text, "12");
        assert_eq!(display.cpm_text, "58 / 58");
        assert!(display.buffer.is_empty());
        assert!(display.restart_enabled);
        assert_eq!(display.final_score, Some(score));
    }

    #[test]
    fn test_density_steps_clamp() {
        let mut display = DisplayState::new(1);
        display.increase_density();
        assert_eq!(display.zoom, MIN_ZOOM);

        for _ in 0..10 {
            display.decrease_density();
        }
        assert_eq!(display.zoom, MAX_ZOOM);

        display.increase_density();
        assert_eq!(display.zoom, MAX_ZOOM - 1);
    }

    #[test]
    fn test_word_flow_wraps_at_the_width() {
        let flow = WordFlow::new(&words(&["ab", "cat", "dog"]), 8, 1);
        // "ab cat " fills 7 of 8 columns; "dog" starts the next row.
        assert_eq!(flow.rows(), &[0, 0, 1]);
        assert_eq!(flow.row_count(), 2);
    }

    #[test]
    fn test_word_flow_zoom_shrinks_the_usable_width() {
        let one = WordFlow::new(&words(&["ab", "cat", "dog"]), 16, 1);
        assert_eq!(one.rows(), &[0, 0, 0]);

        let two = WordFlow::new(&words(&["ab", "cat", "dog"]), 16, 2);
        assert_eq!(two.rows(), &[0, 0, 1]);
    }

    #[test]
    fn test_word_flow_handles_oversized_words() {
        let flow = WordFlow::new(&words(&["extraordinary", "ab"]), 6, 1);
        assert_eq!(flow.rows(), &[0, 1]);
    }

    #[test]
    fn test_word_flow_row_of() {
        let flow = WordFlow::new(&words(&["ab", "cat"]), 40, 1);
        assert_eq!(flow.row_of(0), Some(0));
        assert_eq!(flow.row_of(1), Some(0));
        assert_eq!(flow.row_of(5), None);
    }

    #[test]
    fn test_word_flow_empty_list() {
        let flow = WordFlow::new(&[], 40, 1);
        assert_eq!(flow.row_count(), 0);
        assert_eq!(flow.row_of(0), None);
    }

    #[test]
    fn test_word_flow_counts_display_width_not_bytes() {
        // Both words are four columns wide; bytes would push the wrap.
        let flow = WordFlow::new(&words(&["über", "naïf"]), 10, 1);
        assert_eq!(flow.rows(), &[0, 0]);
    }
}
