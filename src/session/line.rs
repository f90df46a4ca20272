use std::time::Instant;

use crate::keymap::KeyMapper;
use crate::scoring;

/// Session lifecycle. `Complete` is terminal; only [`LineSession::reset`]
/// leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Running,
    Complete,
}

/// One consumed keystroke, after layout translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeystrokeEvent {
    pub expected: char,
    pub actual: char,
    pub correct: bool,
}

/// Per-attempt typing state machine over multi-line source text.
///
/// The source lines and the user's input lines are parallel arrays; the
/// host renders them however it likes. All mutation happens synchronously
/// through `handle_char` / `handle_backspace` / `handle_enter`, one key
/// event at a time. `wpm()` / `accuracy()` / `progress_percent()` are
/// derived views and safe for a periodic refresh tick to read.
pub struct LineSession {
    pub lines: Vec<Vec<char>>,
    pub user_lines: Vec<String>,
    pub current_line: usize,
    pub current_char: usize,
    pub correct_count: usize,
    pub total_count: usize,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    phase: Phase,
}

impl LineSession {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            user_lines: Vec::new(),
            current_line: 0,
            current_char: 0,
            correct_count: 0,
            total_count: 0,
            started_at: None,
            finished_at: None,
            phase: Phase::Idle,
        }
    }

    /// Load new source text, discarding any in-flight state. Empty text is
    /// a legal degenerate session: zero lines, immediately complete.
    pub fn reset(&mut self, text: &str) {
        self.lines = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(|l| l.chars().collect()).collect()
        };
        self.user_lines = vec![String::new(); self.lines.len()];
        self.current_line = 0;
        self.current_char = 0;
        self.correct_count = 0;
        self.total_count = 0;
        self.started_at = None;
        self.finished_at = None;
        self.phase = if self.lines.is_empty() {
            Phase::Complete
        } else {
            Phase::Ready
        };
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Consume one raw keystroke. Returns the translated event, or `None`
    /// when the keystroke is discarded (no text loaded, session already
    /// complete, or an advance past the last line swallowed it).
    ///
    /// Mismatched input is recorded in the user line rather than blocked;
    /// the cursor moves on either way. Input past the end of a line never
    /// lands in the buffer — the line advances first.
    pub fn handle_char(&mut self, raw: char, mapper: &KeyMapper) -> Option<KeystrokeEvent> {
        match self.phase {
            Phase::Idle | Phase::Complete => return None,
            Phase::Ready => {
                self.phase = Phase::Running;
                self.started_at = Some(Instant::now());
            }
            Phase::Running => {}
        }

        let actual = mapper.translate(raw);

        // Already-full line (auto-indented whitespace line, zero-length
        // line): advance before consuming. Consecutive empty lines cascade.
        while !self.is_complete() && self.current_char >= self.lines[self.current_line].len() {
            self.advance_line();
        }
        if self.is_complete() {
            return None;
        }

        let expected = self.lines[self.current_line][self.current_char];
        self.user_lines[self.current_line].push(actual);
        self.total_count += 1;
        let correct = actual == expected;
        if correct {
            self.correct_count += 1;
        }
        self.current_char += 1;

        if self.current_char >= self.lines[self.current_line].len() {
            self.advance_line();
        }

        Some(KeystrokeEvent {
            expected,
            actual,
            correct,
        })
    }

    /// Step back within the current line. The visible buffer shrinks but
    /// the historical keystroke counters stay put. No cross-line backspace.
    pub fn handle_backspace(&mut self) {
        if self.phase == Phase::Idle || self.phase == Phase::Complete {
            return;
        }
        if self.current_char > 0 {
            self.current_char -= 1;
            if !self.user_lines[self.current_line].is_empty() {
                self.user_lines[self.current_line].pop();
            }
        }
    }

    /// Enter forces a line-advance only when the current line is
    /// exhausted; mid-line it is a no-op rather than a newline.
    pub fn handle_enter(&mut self) {
        if self.phase == Phase::Idle || self.phase == Phase::Complete {
            return;
        }
        if self.current_char >= self.lines[self.current_line].len() {
            self.advance_line();
        }
    }

    // Move past the end of the current line: either onto the next line
    // (pre-seeding its leading indentation) or into the terminal state.
    fn advance_line(&mut self) {
        if self.current_line + 1 < self.lines.len() {
            self.current_line += 1;
            self.current_char = 0;
            self.apply_auto_indent();
        } else {
            // current_line == lines.len() is the completion marker
            self.current_line = self.lines.len();
            self.phase = Phase::Complete;
            if self.finished_at.is_none() {
                self.finished_at = Some(Instant::now());
            }
        }
    }

    // Leading spaces of the new line are seeded into the user buffer so
    // code indentation never has to be retyped.
    fn apply_auto_indent(&mut self) {
        let indent = self.lines[self.current_line]
            .iter()
            .take_while(|&&c| c == ' ')
            .count();
        if indent > 0 {
            let user = &mut self.user_lines[self.current_line];
            if user.chars().count() < indent {
                *user = " ".repeat(indent);
            }
            self.current_char = self.current_char.max(indent);
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn wpm(&self) -> f64 {
        scoring::words_per_minute(self.total_count, self.elapsed_secs())
    }

    pub fn accuracy(&self) -> f64 {
        scoring::accuracy_percent(self.correct_count, self.total_count)
    }

    /// Percentage of source characters covered by input, capped per line
    /// so over-long buffers never inflate it. Zero for empty source text.
    pub fn progress_percent(&self) -> f64 {
        let total: usize = self.lines.iter().map(|l| l.len()).sum();
        if total == 0 {
            return 0.0;
        }
        let completed: usize = self
            .lines
            .iter()
            .zip(&self.user_lines)
            .map(|(line, user)| user.chars().count().min(line.len()))
            .sum();
        (completed as f64 / total as f64) * 100.0
    }
}

impl Default for LineSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::KeyMapper;

    fn identity_mapper() -> KeyMapper {
        let mut mapper = KeyMapper::default();
        mapper.set_enabled(false);
        mapper
    }

    // Type exactly what the session expects next, Enter at line ends.
    // Auto-indented positions are already consumed, so they are skipped
    // the way a real typist would skip them.
    fn replay(session: &mut LineSession, mapper: &KeyMapper) {
        while !session.is_complete() {
            let line = &session.lines[session.current_line];
            if session.current_char < line.len() {
                let ch = line[session.current_char];
                session.handle_char(ch, mapper);
            } else {
                session.handle_enter();
            }
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = LineSession::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.is_complete());
    }

    #[test]
    fn test_keystroke_while_idle_is_noop() {
        let mut session = LineSession::new();
        let mapper = identity_mapper();
        assert_eq!(session.handle_char('a', &mapper), None);
        session.handle_backspace();
        session.handle_enter();
        assert_eq!(session.total_count, 0);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_empty_text_completes_immediately() {
        let mut session = LineSession::new();
        session.reset("");
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.lines.len(), 0);
        assert_eq!(session.wpm(), 0.0);
        assert_eq!(session.accuracy(), 0.0);
        assert_eq!(session.progress_percent(), 0.0);
        // Terminal: further input is discarded
        let mapper = identity_mapper();
        assert_eq!(session.handle_char('a', &mapper), None);
        assert_eq!(session.total_count, 0);
    }

    #[test]
    fn test_first_keystroke_starts_the_timer() {
        let mut session = LineSession::new();
        session.reset("abc");
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.started_at.is_none());

        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.started_at.is_some());
    }

    #[test]
    fn test_round_trip_replay_is_perfect() {
        let text = "fn main() {\n    let x = 1;\n}";
        let mut session = LineSession::new();
        session.reset(text);
        let mapper = identity_mapper();
        replay(&mut session, &mapper);

        assert!(session.is_complete());
        let source_len: usize = text.split('\n').map(|l| l.chars().count()).sum();
        // Auto-indented spaces are seeded, not typed, so they never hit
        // the counters.
        let seeded = 4;
        assert_eq!(session.total_count, source_len - seeded);
        assert_eq!(session.correct_count, session.total_count);
        assert_eq!(session.accuracy(), 100.0);
        assert_eq!(session.progress_percent(), 100.0);
    }

    #[test]
    fn test_round_trip_counts_match_source_length() {
        // No indented lines, so every source char is one keystroke
        let text = "hello\nworld";
        let mut session = LineSession::new();
        session.reset(text);
        let mapper = identity_mapper();
        replay(&mut session, &mapper);

        assert!(session.is_complete());
        assert_eq!(session.total_count, 10);
        assert_eq!(session.correct_count, 10);
        assert_eq!(session.accuracy(), 100.0);
        assert_eq!(session.user_lines, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_mismatch_is_recorded_not_blocked() {
        let mut session = LineSession::new();
        session.reset("abc");
        let mapper = identity_mapper();

        let event = session.handle_char('x', &mapper).unwrap();
        assert_eq!(event.expected, 'a');
        assert_eq!(event.actual, 'x');
        assert!(!event.correct);
        assert_eq!(session.user_lines[0], "x");
        assert_eq!(session.current_char, 1);
        assert_eq!(session.total_count, 1);
        assert_eq!(session.correct_count, 0);
    }

    #[test]
    fn test_scenario_wrong_char_on_last_position_completes() {
        // "ab": correct 'a', wrong 'x' on the final position
        let mut session = LineSession::new();
        session.reset("ab");
        let mapper = identity_mapper();

        session.handle_char('a', &mapper);
        assert_eq!(session.current_char, 1);
        session.handle_char('x', &mapper);

        assert!(session.is_complete());
        assert_eq!(session.total_count, 2);
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.accuracy(), 50.0);
    }

    #[test]
    fn test_backspace_at_line_start_is_idempotent() {
        let mut session = LineSession::new();
        session.reset("abc");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_backspace();
        assert_eq!(session.current_char, 0);
        assert_eq!(session.user_lines[0], "");

        session.handle_backspace();
        assert_eq!(session.current_char, 0);
        assert_eq!(session.current_line, 0);
        assert_eq!(session.user_lines[0], "");
        assert_eq!(session.total_count, 1);
    }

    #[test]
    fn test_backspace_keeps_keystroke_counters() {
        let mut session = LineSession::new();
        session.reset("abc");
        let mapper = identity_mapper();
        session.handle_char('x', &mapper);
        session.handle_backspace();
        // Counters are history, the buffer is presentation
        assert_eq!(session.total_count, 1);
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.user_lines[0], "");

        session.handle_char('a', &mapper);
        assert_eq!(session.total_count, 2);
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.user_lines[0], "a");
    }

    #[test]
    fn test_enter_mid_line_is_noop() {
        let mut session = LineSession::new();
        session.reset("ab\ncd");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_enter();
        assert_eq!(session.current_line, 0);
        assert_eq!(session.current_char, 1);
    }

    #[test]
    fn test_enter_on_exhausted_line_advances() {
        let mut session = LineSession::new();
        session.reset("ab\ncd");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_char('b', &mapper);
        // Typing the last char already advanced
        assert_eq!(session.current_line, 1);
        assert_eq!(session.current_char, 0);

        session.handle_char('c', &mapper);
        session.handle_char('d', &mapper);
        assert!(session.is_complete());
    }

    #[test]
    fn test_auto_indent_seeds_leading_spaces() {
        let mut session = LineSession::new();
        session.reset("ab\n  x");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_char('b', &mapper);

        assert_eq!(session.current_line, 1);
        assert_eq!(session.current_char, 2);
        assert_eq!(session.user_lines[1], "  ");
        // Seeding is not a keystroke
        assert_eq!(session.total_count, 2);

        session.handle_char('x', &mapper);
        assert!(session.is_complete());
        assert_eq!(session.user_lines[1], "  x");
        assert_eq!(session.accuracy(), 100.0);
    }

    #[test]
    fn test_empty_lines_cascade_on_next_keystroke() {
        let mut session = LineSession::new();
        session.reset("a\n\n\nb");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        assert_eq!(session.current_line, 1);

        // Both empty lines are skipped before the keystroke is consumed
        let event = session.handle_char('b', &mapper).unwrap();
        assert!(event.correct);
        assert!(session.is_complete());
        assert_eq!(session.total_count, 2);
    }

    #[test]
    fn test_trailing_empty_line_completes_on_advance_attempt() {
        let mut session = LineSession::new();
        session.reset("ab\n");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_char('b', &mapper);
        assert_eq!(session.current_line, 1);
        assert!(!session.is_complete());

        // Enter on the exhausted empty last line finishes the session; the
        // same is true for a discarded character.
        session.handle_enter();
        assert!(session.is_complete());
    }

    #[test]
    fn test_dvorak_mapped_input() {
        // QWERTY home-row presses j,k,l produce Dvorak h,t,n
        let mut session = LineSession::new();
        session.reset("htn");
        let mapper = KeyMapper::default();

        for raw in ['j', 'k', 'l'] {
            let event = session.handle_char(raw, &mapper).unwrap();
            assert!(event.correct, "raw {raw:?} should map to expected char");
        }
        assert!(session.is_complete());
        assert_eq!(session.user_lines[0], "htn");
        assert_eq!(session.accuracy(), 100.0);
    }

    #[test]
    fn test_progress_percent_partial() {
        let mut session = LineSession::new();
        session.reset("abcd\nefgh");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_char('b', &mapper);
        assert_eq!(session.progress_percent(), 25.0);
    }

    #[test]
    fn test_reset_mid_session_discards_state() {
        let mut session = LineSession::new();
        session.reset("abc");
        let mapper = identity_mapper();
        session.handle_char('a', &mapper);
        session.handle_char('b', &mapper);

        session.reset("xy");
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.total_count, 0);
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.current_line, 0);
        assert_eq!(session.current_char, 0);
        assert!(session.started_at.is_none());
        assert_eq!(session.user_lines, vec![String::new()]);
    }
}
