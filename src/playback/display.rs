//! What the presentation layer shows for the current word.

use std::fmt;

/// Character index of the optimal recognition point in a word of
/// `char_len` characters.
///
/// Roughly a third of the way in: `round((len - 1) / 3)`, except that
/// two-letter words focus their second letter.
pub fn orp_index(char_len: usize) -> usize {
    match char_len {
        0 | 1 => 0,
        2 => 1,
        // round((n - 1) / 3) == n / 3 for whole n
        n => n / 3,
    }
}

/// A word split around its recognition point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordDisplay<'a> {
    pub before: &'a str,
    pub focus: &'a str,
    pub after: &'a str,
}

impl<'a> WordDisplay<'a> {
    pub fn new(word: &'a str) -> Self {
        let orp = orp_index(word.chars().count());
        let mut bounds = word.char_indices().map(|(i, _)| i).skip(orp);
        let Some(start) = bounds.next() else {
            return Self {
                before: word,
                focus: "",
                after: "",
            };
        };
        let end = bounds.next().unwrap_or(word.len());
        Self {
            before: &word[..start],
            focus: &word[start..end],
            after: &word[end..],
        }
    }
}

impl fmt::Display for WordDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.before, self.focus, self.after)
    }
}

/// Reading progress through the open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Rounded percentage of words before the cursor.
    pub percent: u32,
    /// One-based number of the current word, 0 when there are none.
    pub word_number: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(index: usize, total: usize) -> Self {
        if total == 0 {
            return Self::default();
        }
        Self {
            percent: (index as f64 / total as f64 * 100.0).round() as u32,
            word_number: index + 1,
            total,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% \u{2022} Word {}/{}",
            self.percent, self.word_number, self.total
        )
    }
}
