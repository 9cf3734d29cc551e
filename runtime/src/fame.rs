//! Fame score: biography length in words.

/// Whitespace-delimited word count of the biography; 0 when there is none.
pub fn fame(biography: Option<&str>) -> u32 {
    biography
        .map(|b| b.split_whitespace().count())
        .unwrap_or(0)
        .try_into()
        .unwrap_or(u32::MAX)
}
