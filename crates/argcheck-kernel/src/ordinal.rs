//! English ordinals for 1-based argument positions.

/// Format `n` as an English ordinal: `1st`, `2nd`, `3rd`, `4th`, `11th`,
/// `21st`, `112th`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = if (10..20).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}
