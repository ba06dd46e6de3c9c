use crate::score::{per_minute, FinalScore, TEST_SECONDS};
use crate::words::WordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Answers which display row a word index sits on. The engine owns no
/// layout; it only compares rows to notice the active word wrapping.
pub trait WordLayout {
    fn row_of(&self, index: usize) -> Option<u16>;
}

/// Facts the engine publishes for the display to apply, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The countdown began and already took its first step.
    Started { remaining: u32 },
    WordJudged { index: usize, outcome: Outcome },
    ActiveWordChanged { index: usize },
    /// The sample ran out before the timer; marks and scroll restart.
    WordsRecycled,
    MetricsUpdated { wpm: usize, cpm: usize },
    ScrollRequested,
    TimerUpdated { remaining: u32 },
    Finished(FinalScore),
}

/// One timed test. Consumes keystroke buffers, judges whitespace-terminated
/// submissions against the sampled words and counts down from
/// [`TEST_SECONDS`]. Replaced wholesale on reset; cursor and tallies only
/// ever grow within one session.
#[derive(Debug, Clone)]
pub struct Session {
    pub words: WordList,
    pub cursor: usize,
    pub correct_words: usize,
    pub wrong_words: usize,
    pub correct_chars: usize,
    pub wrong_chars: usize,
    pub remaining_seconds: u32,
    pub line_breaks: u32,
    timer_running: bool,
    input_locked: bool,
    last_judged: Option<(usize, String)>,
}

impl Session {
    pub fn new(words: WordList) -> Self {
        Self {
            words,
            cursor: 0,
            correct_words: 0,
            wrong_words: 0,
            correct_chars: 0,
            wrong_chars: 0,
            remaining_seconds: TEST_SECONDS,
            line_breaks: 0,
            timer_running: false,
            input_locked: false,
            last_judged: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.input_locked {
            Phase::Finished
        } else if self.timer_running {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    pub fn has_started(&self) -> bool {
        self.timer_running || self.input_locked
    }

    pub fn has_finished(&self) -> bool {
        self.input_locked
    }

    /// Index of the word being typed, wrapped onto the display range.
    pub fn active_index(&self) -> usize {
        if self.words.is_empty() {
            0
        } else {
            self.cursor % self.words.len()
        }
    }

    /// Feed the current keystroke buffer. Call on every edit; a buffer
    /// ending in whitespace submits its trimmed content for judging.
    pub fn submit_input(&mut self, buffer: &str, layout: &dyn WordLayout) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.input_locked {
            return events;
        }

        let trimmed = buffer.trim();
        if !self.timer_running && !trimmed.is_empty() {
            self.start_countdown(&mut events);
        }
        if !buffer.ends_with(char::is_whitespace) || trimmed.is_empty() {
            return events;
        }

        self.judge(trimmed, layout, &mut events);
        events
    }

    /// Advance the countdown by one second. Ignored unless Running; the
    /// path is total, so stale ticks from a replaced session or extra
    /// ticks after the end never move state.
    pub fn on_tick(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.timer_running || self.input_locked {
            return events;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            events.push(SessionEvent::TimerUpdated {
                remaining: self.remaining_seconds,
            });
        } else {
            self.timer_running = false;
            self.input_locked = true;
            events.push(SessionEvent::Finished(FinalScore::from_tallies(
                self.correct_words,
                self.wrong_words,
                self.correct_chars,
                self.wrong_chars,
            )));
        }
        events
    }

    fn start_countdown(&mut self, events: &mut Vec<SessionEvent>) {
        self.timer_running = true;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        events.push(SessionEvent::Started {
            remaining: self.remaining_seconds,
        });
    }

    fn judge(&mut self, typed: &str, layout: &dyn WordLayout, events: &mut Vec<SessionEvent>) {
        if self.words.is_empty() {
            return;
        }
        // A resubmission of the word just judged, before anything else
        // moved the cursor, is the double fire of one commit.
        if self
            .last_judged
            .as_ref()
            .is_some_and(|(cursor, word)| *cursor == self.cursor && word == typed)
        {
            return;
        }

        let index = match self.words.word_at(self.cursor) {
            Ok(_) => self.cursor,
            Err(past_the_end) => match past_the_end.wrapped_index() {
                Some(wrapped) => wrapped,
                None => return,
            },
        };
        let Ok(expected) = self.words.word_at(index).map(str::to_string) else {
            return;
        };

        let charge = expected.chars().count();
        let outcome = if typed == expected {
            self.correct_words += 1;
            self.correct_chars += charge;
            Outcome::Correct
        } else {
            self.wrong_words += 1;
            self.wrong_chars += charge;
            Outcome::Incorrect
        };
        events.push(SessionEvent::WordJudged { index, outcome });

        self.cursor += 1;
        self.last_judged = Some((self.cursor, typed.to_string()));
        let next_index = self.active_index();
        if next_index == 0 {
            events.push(SessionEvent::WordsRecycled);
            self.line_breaks = 0;
        }
        events.push(SessionEvent::ActiveWordChanged { index: next_index });
        events.push(SessionEvent::MetricsUpdated {
            wpm: per_minute(self.correct_words, self.remaining_seconds),
            cpm: per_minute(self.correct_chars, self.remaining_seconds),
        });

        if next_index != 0 {
            if let (Some(prev_row), Some(next_row)) =
                (layout.row_of(index), layout.row_of(next_index))
            {
                if next_row > prev_row {
                    self.line_breaks += 1;
                    if self.line_breaks > 1 {
                        events.push(SessionEvent::ScrollRequested);
                    }
                }
            }
        }
    }
}
