//! Typographic normalization for editorial copy.
//!
//! Straight quotes become curly quotes, double hyphens become em-dashes and
//! three dots become a real ellipsis. Applied to titles, artist names and
//! review text before they reach the catalog.

const OPEN_DOUBLE: char = '\u{201C}';
const CLOSE_DOUBLE: char = '\u{201D}';
const OPEN_SINGLE: char = '\u{2018}';
const CLOSE_SINGLE: char = '\u{2019}';
const EM_DASH: char = '\u{2014}';
const ELLIPSIS: char = '\u{2026}';

/// True if a quote right after `prev` should open rather than close.
fn opens_after(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => {
            c.is_whitespace()
                || matches!(c, '(' | '[' | '{' | OPEN_DOUBLE | OPEN_SINGLE | EM_DASH)
        }
    }
}

/// Apply typographic substitutions to a piece of copy.
pub fn educate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(ch) = chars.next() {
        let emitted = match ch {
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                EM_DASH
            }
            '.' => {
                // Three consecutive dots collapse into an ellipsis.
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('.') && lookahead.next() == Some('.') {
                    chars.next();
                    chars.next();
                    ELLIPSIS
                } else {
                    '.'
                }
            }
            '"' => {
                if opens_after(prev) {
                    OPEN_DOUBLE
                } else {
                    CLOSE_DOUBLE
                }
            }
            '\'' => {
                let next_alnum = chars.peek().map(|c| c.is_alphanumeric()).unwrap_or(false);
                let prev_alnum = prev.map(|c| c.is_alphanumeric()).unwrap_or(false);
                if prev_alnum && next_alnum {
                    // Apostrophe inside a word.
                    CLOSE_SINGLE
                } else if opens_after(prev) {
                    OPEN_SINGLE
                } else {
                    CLOSE_SINGLE
                }
            }
            other => other,
        };
        out.push(emitted);
        prev = Some(emitted);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curls_double_quotes() {
        assert_eq!(educate("\"Heroes\""), "\u{201C}Heroes\u{201D}");
        assert_eq!(
            educate("she said \"yes\" twice"),
            "she said \u{201C}yes\u{201D} twice"
        );
    }

    #[test]
    fn curls_apostrophes() {
        assert_eq!(educate("Don't Stop"), "Don\u{2019}t Stop");
        assert_eq!(educate("it's"), "it\u{2019}s");
    }

    #[test]
    fn curls_single_quotes() {
        assert_eq!(educate("'round here'"), "\u{2018}round here\u{2019}");
    }

    #[test]
    fn replaces_double_hyphen_with_em_dash() {
        assert_eq!(educate("wait--what"), "wait\u{2014}what");
    }

    #[test]
    fn replaces_triple_dot_with_ellipsis() {
        assert_eq!(educate("to be continued..."), "to be continued\u{2026}");
        // A lone dot is left alone.
        assert_eq!(educate("St. Vincent"), "St. Vincent");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(educate("The War on Drugs"), "The War on Drugs");
        assert_eq!(educate(""), "");
    }
}
