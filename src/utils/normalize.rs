const EMPHASIS_MARKERS: [char; 3] = ['*', '_', '`'];

/// Canonical form used for answer comparison: emphasis markers and a leading
/// choice label removed, all whitespace dropped, lowercased.
pub fn normalize_answer(raw: &str) -> String {
    let plain = strip_emphasis(raw);
    strip_choice_label(plain.trim())
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn strip_emphasis(raw: &str) -> String {
    raw.chars().filter(|c| !EMPHASIS_MARKERS.contains(c)).collect()
}

/// Removes a leading `a)`, `(a)` or `a.` label. A dotted label must be
/// followed by whitespace, so `U.S.` is left alone.
pub fn strip_choice_label(s: &str) -> &str {
    let s = s.trim_start();
    let (rest, parenthesized) = match s.strip_prefix('(') {
        Some(rest) => (rest, true),
        None => (s, false),
    };
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), Some(')')) if c.is_ascii_alphabetic() => chars.as_str().trim_start(),
        (Some(c), Some('.'))
            if c.is_ascii_alphabetic()
                && !parenthesized
                && chars.as_str().starts_with(char::is_whitespace) =>
        {
            chars.as_str().trim_start()
        }
        _ => s,
    }
}

/// Zero-based option index for an answer that is only a choice label,
/// e.g. `B`, `b)`, `(B)` or `B.`.
pub fn choice_label_index(raw: &str) -> Option<usize> {
    let compact: String = strip_emphasis(raw)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let inner = compact
        .trim_start_matches('(')
        .trim_end_matches(&[')', '.', ':'][..]);
    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_lowercase() as u8 - b'a') as usize)
        }
        _ => None,
    }
}
