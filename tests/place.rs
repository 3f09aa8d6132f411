use quake_feed::place::{matches_query, normalize_for_search, short_place};

#[test]
fn last_separator_wins() {
    assert_eq!(
        short_place("23km ENE of City of Springs, Region"),
        "Springs, Region"
    );
    assert_eq!(short_place("10km N of Elsinore"), "Elsinore");
}

#[test]
fn place_without_separator_is_unchanged() {
    assert_eq!(short_place("Central Alaska"), "Central Alaska");
    assert_eq!(short_place(""), "");
    // Needs surrounding spaces to count as a separator.
    assert_eq!(short_place("Gulf ofAlaska"), "Gulf ofAlaska");
}

#[test]
fn occurrences_are_scanned_without_overlap() {
    // " of " at 5 consumes the space the second "of" would need.
    assert_eq!(short_place("5km N of of Town"), "of Town");
    assert_eq!(short_place("north of "), "");
}

#[test]
fn matching_ignores_ascii_case() {
    for query in ["TOKYO", "tokyo", "ToKyO", "kyo, jap"] {
        assert!(matches_query("3 km SW of Tokyo, Japan", query), "query {query}");
    }
    assert!(matches_query("Tokyo, Japan", "TOKYO"));
    assert!(!matches_query("3 km SW of Tokyo, Japan", "osaka"));
}

#[test]
fn normalization_is_ascii_only() {
    assert_eq!(normalize_for_search("ÉVORA, Portugal"), "Évora, portugal");
}
