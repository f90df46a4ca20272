//! Pure scoring functions. These are views over session counters, never
//! independently mutated state: the "final" metrics of a session are just
//! these functions evaluated at the completion instant.

/// Standard five-chars-per-word WPM over every keystroke consumed by the
/// session, correct or not.
pub fn words_per_minute(total_count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (total_count as f64 / 5.0) / (elapsed_secs / 60.0)
}

pub fn accuracy_percent(correct_count: usize, total_count: usize) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    (correct_count as f64 / total_count as f64) * 100.0
}

/// Fixed multiplier per practice tier. `"typing"` is the plain
/// (non-coding) session tag; unknown tags score at the base rate.
pub fn difficulty_multiplier(difficulty: &str) -> f64 {
    match difficulty {
        "basic" => 1.0,
        "intermediate" => 1.5,
        "advanced" => 2.0,
        "typing" => 1.0,
        _ => 1.0,
    }
}

/// Difficulty-weighted score, rounded to two decimal places so persisted
/// values compare cleanly across sessions.
pub fn score(wpm: f64, accuracy: f64, difficulty: &str) -> f64 {
    let raw = wpm * (accuracy / 100.0) * difficulty_multiplier(difficulty);
    (raw * 100.0).round() / 100.0
}
