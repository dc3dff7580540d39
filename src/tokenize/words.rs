//! Word splitting and punctuation merging shared by every format.

/// Marks that get padded with spaces so they split off as their own tokens.
pub const SPACED_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':', '\u{2013}', '\u{2014}'];

/// Single-character tokens that attach to the preceding word.
///
/// Same as [`SPACED_PUNCTUATION`] plus the ASCII hyphen, so a dash typed
/// as " - " between words does not get a slot of its own.
pub const MERGED_PUNCTUATION: &[char] =
    &['-', ',', '.', '!', '?', ';', ':', '\u{2013}', '\u{2014}'];

/// Surround every spaced punctuation mark with a single space on each side.
pub fn space_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        if SPACED_PUNCTUATION.contains(&c) {
            out.push(' ');
            out.push(c);
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

fn is_merged_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if MERGED_PUNCTUATION.contains(&c))
}

/// Append single punctuation tokens to the word before them.
///
/// A punctuation token with nothing before it stays a word on its own.
pub fn merge_trailing_punctuation<I>(tokens: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String> + AsRef<str>,
{
    let mut words: Vec<String> = Vec::new();
    for token in tokens {
        if is_merged_punctuation(token.as_ref())
            && let Some(last) = words.last_mut()
        {
            last.push_str(token.as_ref());
            continue;
        }
        words.push(token.into());
    }
    words
}

/// Full word pipeline: space punctuation, split on whitespace, merge.
pub fn split_words(text: &str) -> Vec<String> {
    let spaced = space_punctuation(text);
    merge_trailing_punctuation(spaced.split_whitespace())
}
