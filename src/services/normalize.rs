//! Normalization of raw generated text.
//!
//! Horde workers wrap lines mid-word and mix line-ending styles; this module
//! repairs that before any further post-processing. Pure functions, no I/O.

/// Clean raw generated text.
///
/// - Unifies CRLF/CR line endings to `\n`.
/// - A newline directly between two non-whitespace characters is accidental
///   wrapping, not a paragraph break, and is deleted.
/// - Runs of 3+ newlines collapse to exactly 2 (one paragraph separator).
/// - Leading/trailing whitespace is trimmed.
///
/// Total and idempotent; empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    // Drop newlines flanked by non-whitespace on both sides.
    let mut joined = String::with_capacity(unified.len());
    let chars: Vec<char> = unified.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' {
            let prev_solid = i > 0 && !chars[i - 1].is_whitespace();
            let next_solid = chars.get(i + 1).is_some_and(|n| !n.is_whitespace());
            if prev_solid && next_solid {
                continue;
            }
        }
        joined.push(c);
    }

    // Collapse 3+ newlines to a paragraph separator.
    let mut collapsed = String::with_capacity(joined.len());
    let mut run = 0usize;
    for c in joined.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                collapsed.push(c);
            }
        } else {
            run = 0;
            collapsed.push(c);
        }
    }

    collapsed.trim().to_string()
}
