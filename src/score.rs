//! Quality score heuristic derived from a normalized analysis.

use crate::normalize::Analysis;

/// Maps an analysis to a 0-100 score. All deductions are subtractive
/// from 100: up to 40 for errors, up to 30 for the complexity class,
/// up to 30 for suggestions.
pub fn quality_score(analysis: &Analysis) -> u8 {
    let mut score: i32 = 100;

    score -= 10 * analysis.errors.len().min(4) as i32;
    score -= complexity_deduction(&analysis.time_complexity);
    score -= 5 * analysis.suggestions.len().min(6) as i32;

    score.clamp(0, 100) as u8
}

// Worst matching class wins; a string matching none deducts nothing.
fn complexity_deduction(time_complexity: &str) -> i32 {
    let c = time_complexity.to_lowercase();
    if c.contains("o(n^3)") || c.contains("o(2^n)") || c.contains("o(n!)") {
        30
    } else if c.contains("o(n^2)") {
        20
    } else if c.contains("o(n log n)") {
        10
    } else if c.contains("o(n)") {
        5
    } else {
        0
    }
}
