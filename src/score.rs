/// Test length. The countdown always starts here; sessions never run
/// longer.
pub const TEST_SECONDS: u32 = 60;

/// Seconds the session has been running, derived from the countdown. The
/// `+ 1` keeps the denominator positive before the first full second and
/// damps the rate spike right after the start.
pub fn seconds_elapsed(remaining_seconds: u32) -> u32 {
    TEST_SECONDS.saturating_sub(remaining_seconds) + 1
}

/// Integer per-minute projection of `count` at the current countdown
/// position. Floors, never rounds.
pub fn per_minute(count: usize, remaining_seconds: u32) -> usize {
    count * 60 / seconds_elapsed(remaining_seconds) as usize
}

/// Figures computed once, when the countdown expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScore {
    /// Corrected words per minute. The test runs one minute, so this is
    /// the correct-word tally itself.
    pub wpm: usize,
    /// Shown where the live CPM was: `"{correct_chars} / {total_chars}"`.
    pub score_text: String,
    /// Two-line verdict for the results dialog.
    pub message_text: String,
    pub correct_words: usize,
    pub wrong_words: usize,
    pub correct_chars: usize,
    pub wrong_chars: usize,
}

impl FinalScore {
    pub fn from_tallies(
        correct_words: usize,
        wrong_words: usize,
        correct_chars: usize,
        wrong_chars: usize,
    ) -> Self {
        let total_cpm = correct_chars + wrong_chars;
        let score_text = format!("{correct_chars} / {total_cpm}");

        let mut message_text = format!(
            "Your score is {correct_chars} CPM (that is {correct_words} Words Per Minute)\n"
        );
        if wrong_words == 0 {
            message_text.push_str(&format!(
                "Congratulations! You did all {correct_words} correctly!"
            ));
        } else {
            let noun = if wrong_words == 1 { "word" } else { "words" };
            message_text.push_str(&format!(
                "You did {total_cpm} CPM, but as you got {wrong_words} {noun} wrong your score was corrected."
            ));
        }

        Self {
            wpm: correct_words,
            score_text,
            message_text,
            correct_words,
            wrong_words,
            correct_chars,
            wrong_chars,
        }
    }
}
