//! Search-term highlighting

use serde::Serialize;

/// A run of text that either matches the search term or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` into matched and unmatched runs of `term`, ignoring case.
///
/// Matches never overlap and are found left to right. An empty or
/// whitespace-only term yields the whole text as one unmatched segment.
pub fn highlight<'a>(text: &'a str, term: &str) -> Vec<Segment<'a>> {
    if term.trim().is_empty() || text.is_empty() {
        return vec![Segment {
            text,
            matched: false,
        }];
    }

    let needle: Vec<char> = term.to_lowercase().chars().collect();
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        match match_len(&text[cursor..], &needle) {
            Some(len) => {
                if plain_start < cursor {
                    segments.push(Segment {
                        text: &text[plain_start..cursor],
                        matched: false,
                    });
                }
                segments.push(Segment {
                    text: &text[cursor..cursor + len],
                    matched: true,
                });
                cursor += len;
                plain_start = cursor;
            }
            None => {
                cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment {
            text: &text[plain_start..],
            matched: false,
        });
    }

    segments
}

// Byte length of the shortest prefix of `haystack` whose lowercase form starts
// with `needle`. A match may end inside the lowercase expansion of a character
// (`İ` lowercases to `i̇`), in which case the whole character is covered.
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, c) in haystack.char_indices() {
        for lower in c.to_lowercase() {
            if matched == needle.len() {
                break;
            }
            if needle[matched] != lower {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}
