use std::borrow::Cow;

/// Phrase separating the distance/direction prefix from the nearest place.
pub const PLACE_SEPARATOR: &str = " of ";

/// Returns the text after the last `" of "` in `place`, or `place` itself.
///
/// Occurrences are found left to right without overlap, so nested names such
/// as `"23km ENE of City of Springs"` resolve to `"Springs"`.
pub fn short_place(place: &str) -> &str {
    let mut last_end = None;
    let mut offset = 0usize;
    while let Some(found) = place[offset..].find(PLACE_SEPARATOR) {
        offset += found + PLACE_SEPARATOR.len();
        last_end = Some(offset);
    }
    match last_end {
        Some(end) => &place[end..],
        None => place,
    }
}

/// ASCII-lowercased copy for comparisons; never shown to the user.
pub fn normalize_for_search(value: &str) -> Cow<'_, str> {
    if value.bytes().any(|byte| byte.is_ascii_uppercase()) {
        Cow::Owned(value.to_ascii_lowercase())
    } else {
        Cow::Borrowed(value)
    }
}

/// True when the short form of `place` contains `query`, ignoring ASCII case.
pub fn matches_query(place: &str, query: &str) -> bool {
    let haystack = normalize_for_search(short_place(place));
    let needle = normalize_for_search(query);
    haystack.contains(&*needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_input_is_borrowed() {
        assert!(matches!(normalize_for_search("tokyo"), Cow::Borrowed(_)));
        assert_eq!(normalize_for_search("TōKYO"), "tōkyo");
    }

    #[test]
    fn query_matches_only_short_place() {
        // "km" is in the distance prefix, not in the nearest place.
        assert!(!matches_query("10 km N of Elsinore, CA", "km"));
        assert!(matches_query("10 km N of Elsinore, CA", "ELSI"));
    }
}
