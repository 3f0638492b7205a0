use super::*;

/// The one-box search of the static variant: a location matches when its
/// name contains the query case-insensitively or its category equals it.
/// An empty query matches nothing, mirroring the original's clear-on-empty.
pub fn search_dataset(locations: &[Location], query: &str) -> Vec<Location> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return vec![];
    }

    locations
        .iter()
        .filter(|location| {
            location.name.to_lowercase().contains(&query)
                || location.category.name().eq_ignore_ascii_case(&query)
        })
        .copied()
        .collect()
}

/// The category dropdown filter. `None` is browse mode: everything.
pub fn filter_by_category(locations: &[Location], category: Option<Category>) -> Vec<Location> {
    match category {
        None => locations.to_vec(),
        Some(category) => locations
            .iter()
            .filter(|location| location.category == category)
            .copied()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_is_case_insensitive() {
        let matches = search_dataset(&LOCATIONS, "taj");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Taj Mahal");
        assert_eq!(search_dataset(&LOCATIONS, "TAJ"), matches);
    }

    #[test]
    fn category_name_matches_exactly() {
        // "park" matches Cubbon Park by name and both parks by category.
        let matches = search_dataset(&LOCATIONS, "park");
        assert_eq!(matches.len(), 2);
        // "par" is a substring of neither category, only of the names.
        let matches = search_dataset(&LOCATIONS, "par");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Cubbon Park");
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(search_dataset(&LOCATIONS, "").is_empty());
        assert!(search_dataset(&LOCATIONS, "   ").is_empty());
    }

    #[test]
    fn category_filter_selects_the_parks() {
        let parks = filter_by_category(&LOCATIONS, Some(Category::Park));
        assert_eq!(parks.len(), 2);
        assert!(parks.iter().all(|location| location.category == Category::Park));
    }

    #[test]
    fn no_category_is_browse_mode() {
        assert_eq!(filter_by_category(&LOCATIONS, None).len(), LOCATIONS.len());
    }
}
