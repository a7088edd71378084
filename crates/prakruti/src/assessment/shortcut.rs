//! Keyboard shortcut mapping, kept free of any UI event plumbing.

/// Map a pressed key to a zero-based option index. Only `1` through `9` are bound.
pub fn option_index_for_key(key: char) -> Option<usize> {
    match key {
        '1'..='9' => key.to_digit(10).map(|digit| digit as usize - 1),
        _ => None,
    }
}
