//! Wildcard classification for term values.

/// The wildcard a term carries. A valid term holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// `?` replaces exactly one character.
    Single,
    /// `*` replaces zero or more characters; only valid at the end of a term.
    Multiple,
}

impl Wildcard {
    /// Returns the first wildcard found in `value`, if any.
    pub fn detect(value: &str) -> Option<Wildcard> {
        value.chars().find_map(|c| match c {
            '?' => Some(Wildcard::Single),
            '*' => Some(Wildcard::Multiple),
            _ => None,
        })
    }
}
