// WHY: aligns acronym letters with the words of a candidate expansion
// Every acronym letter must come from a word start or from inside a word already in use

use super::normalization::{MatchBuffer, WORD_END};

/// Try to match the remaining acronym letters from word `word`, offset `pos`.
///
/// Returns one past the index of the last word consumed.
/// Recursion depth is bounded by the acronym length.
fn match_here(buf: &MatchBuffer, acronym: &[char], word: usize, pos: usize) -> Option<usize> {
    let Some((&letter, rest)) = acronym.split_first() else {
        return Some(word + 1);
    };

    // more letters from the current word
    let mut pos = pos;
    loop {
        let c = buf.char_at(word, pos);
        if c == WORD_END {
            break;
        }
        if c == letter {
            if let Some(end) = match_here(buf, rest, word, pos + 1) {
                return Some(end);
            }
        }
        pos += 1;
    }

    // or the start of a later word; "x" may also stand for a word's second letter
    for next in word + 1..buf.word_count() {
        if buf.char_at(next, 0) == letter {
            if let Some(end) = match_here(buf, rest, next, 1) {
                return Some(end);
            }
        }
        if letter == 'x' && buf.char_at(next, 1) == letter {
            if let Some(end) = match_here(buf, rest, next, 2) {
                return Some(end);
            }
        }
    }

    None
}

/// "expansion (ACR)": find the latest word from which the whole acronym matches.
///
/// Returns the index of the first matched word.
pub fn match_reverse(buf: &MatchBuffer) -> Option<usize> {
    let (&first, rest) = buf.acronym().split_first()?;
    (0..buf.word_count())
        .rev()
        .find(|&start| buf.char_at(start, 0) == first && match_here(buf, rest, start, 1).is_some())
}

/// "ACR (expansion)": the match must begin at the first word.
///
/// Returns one past the index of the last matched word.
pub fn match_forward(buf: &MatchBuffer) -> Option<usize> {
    let (&first, rest) = buf.acronym().split_first()?;
    if buf.word_count() == 0 || buf.char_at(0, 0) != first {
        return None;
    }
    match_here(buf, rest, 0, 1)
}
