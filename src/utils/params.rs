/// Split a comma separated list such as `"alt,lon"`.
///
/// An empty string is an empty list, not a list holding one empty value.
/// Whitespace around each value is trimmed in the returned slices only; the
/// source string is never modified.
pub fn split_values(list: &str) -> Vec<&str> {
    if list.is_empty() {
        return Vec::new();
    }

    list.split(',').map(str::trim).collect()
}

/// Number of values in a comma separated list, see [`split_values`].
pub fn count_values(list: &str) -> usize {
    split_values(list).len()
}
