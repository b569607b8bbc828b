/// Words that mark a headline as market-moving.
pub const STRONG_WORDS: [&str; 16] = [
    "emergency",
    "shutdown",
    "crisis",
    "urgent",
    "breaking",
    "war",
    "attack",
    "crash",
    "collapse",
    "ban",
    "sanction",
    "legal",
    "sue",
    "lawsuit",
    "investigation",
    "arrest",
];

/// Relevance level of a news headline: 1, plus 1 per strong word it contains.
///
/// Matching is a case-insensitive substring test, so "sue" also fires on
/// "issue" and "ban" on "bank".
pub fn relevance(title: &str) -> u32 {
    let lower = title.to_lowercase();
    1 + STRONG_WORDS.iter().filter(|w| lower.contains(*w)).count() as u32
}
