/// Splits `text` into consecutive slices of at most `max_chars` characters,
/// cutting only where whitespace meets a word so no word is ever split.
///
/// The slices concatenate back to `text`. A single word longer than
/// `max_chars` is returned whole as its own oversize slice.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    if max_chars == 0 || n <= max_chars {
        return vec![text];
    }

    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < n {
        if n - start <= max_chars {
            chunks.push(&text[offsets[start]..]);
            break;
        }
        let limit = start + max_chars;
        let split = (start + 1..=limit)
            .rev()
            .find(|&k| is_word_boundary(&chars, k))
            .or_else(|| (limit + 1..=n).find(|&k| is_word_boundary(&chars, k)))
            .unwrap_or(n);
        chunks.push(&text[offsets[start]..offsets[split]]);
        start = split;
    }
    chunks
}

fn is_word_boundary(chars: &[char], k: usize) -> bool {
    k == chars.len() || chars[k - 1].is_whitespace() || chars[k].is_whitespace()
}
