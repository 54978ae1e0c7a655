//! Label canonicalization.
//!
//! Models rarely agree on the exact spelling of a workflow name: one answers
//! `**Invoice Processing Bot**.`, another `The invoice processing bot`. Both
//! must land in the same vote bucket, so every comparison in the engine goes
//! through [`normalize`].

use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("invalid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("invalid italic regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+?)`").expect("invalid inline code regex"));
static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("invalid bracket regex"));
static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:the|a|an)\s+").expect("invalid article regex"));

const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

/// Canonicalize a free-text label so textually-equivalent labels compare equal.
///
/// Applied in order: strip bold, italic and inline-code emphasis, strip
/// `[x]` brackets, strip one pair of wrapping quotes, strip trailing
/// punctuation, strip one leading article, collapse whitespace, trim and
/// lowercase.
///
/// The pass is repeated until the output stops changing, which makes the
/// function idempotent (`"the the bot"` ends up as `"bot"` rather than
/// `"the bot"` on the first call and `"bot"` on the second).
///
/// # Example
///
/// ```
/// use consensus_domain::text::normalize;
///
/// assert_eq!(normalize("**Support Bot**."), "support bot");
/// assert_eq!(normalize("The Support Bot"), "support bot");
/// assert_eq!(normalize("\"support   bot\""), "support bot");
/// ```
pub fn normalize(label: &str) -> String {
    let mut current = normalize_pass(label);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Remove markdown emphasis and brackets while keeping the original casing.
///
/// Used for display names taken from table cells.
pub fn strip_markup(label: &str) -> String {
    let stripped = strip_emphasis(label);
    stripped.trim().to_string()
}

fn strip_emphasis(label: &str) -> String {
    let s = BOLD.replace_all(label, "$1");
    let s = ITALIC.replace_all(&s, "$1");
    let s = INLINE_CODE.replace_all(&s, "$1");
    BRACKETS.replace_all(&s, "$1").into_owned()
}

fn normalize_pass(label: &str) -> String {
    let stripped = strip_emphasis(label);
    let unquoted = strip_wrapping_quotes(stripped.trim());
    let unpunctuated = unquoted.trim_end_matches(TRAILING_PUNCTUATION).trim_end();
    let without_article = LEADING_ARTICLE.replace(unpunctuated, "");

    without_article
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_wrapping_quotes(s: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if s.chars().count() >= 2
            && let Some(inner) = s.strip_prefix(open).and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    s
}
