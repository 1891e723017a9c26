//! # Catalog Filter
//!
//! Pure filtering over loaded business records. Three independent
//! selections, each either `"all"` or a concrete option drawn from the
//! lists shipped alongside the businesses:
//! - category: exact match
//! - location: case-insensitive substring match
//! - price: resolve the selection to a price band, compare the first
//!   `$<digits>` token on each side, match within $10
//!
//! Input order is preserved. An empty match set is a distinct outcome
//! ([`Listing::NoResults`]), not an error.
use regex::Regex;

use crate::model::{Business, PriceRange};

/// The pass-through selection value for every filter dimension.
pub const ALL: &str = "all";

#[derive(Clone, Debug)]
pub struct FilterSelection {
    pub category: String,
    pub location: String,
    pub price: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            category: ALL.to_string(),
            location: ALL.to_string(),
            price: ALL.to_string(),
        }
    }
}

impl FilterSelection {
    pub fn new(category: &str, location: &str, price: &str) -> Self {
        Self {
            category: category.to_string(),
            location: location.to_string(),
            price: price.to_string(),
        }
    }
}

/// Render model for a filtered page: either the matching cards, in input
/// order, or the explicit no-results state.
#[derive(Debug, PartialEq)]
pub enum Listing<'a> {
    Results(Vec<&'a Business>),
    NoResults,
}

pub fn filter<'a>(
    businesses: &'a [Business],
    selection: &FilterSelection,
    price_ranges: &[PriceRange],
) -> Vec<&'a Business> {
    businesses
        .iter()
        .filter(|business| {
            matches_category(business, &selection.category)
                && matches_location(business, &selection.location)
                && matches_price(business, &selection.price, price_ranges)
        })
        .collect()
}

pub fn listing<'a>(
    businesses: &'a [Business],
    selection: &FilterSelection,
    price_ranges: &[PriceRange],
) -> Listing<'a> {
    let matched = filter(businesses, selection, price_ranges);

    if matched.is_empty() {
        Listing::NoResults
    } else {
        Listing::Results(matched)
    }
}

fn matches_category(business: &Business, selection: &str) -> bool {
    selection == ALL || business.category == selection
}

fn matches_location(business: &Business, selection: &str) -> bool {
    selection == ALL
        || business
            .location
            .to_lowercase()
            .contains(&selection.to_lowercase())
}

// A selection that resolves to no known band, or a price string without a
// dollar token on either side, never matches.
fn matches_price(business: &Business, selection: &str, price_ranges: &[PriceRange]) -> bool {
    if selection == ALL {
        return true;
    }

    let Some(range) = price_ranges.iter().find(|price| price.id == selection) else {
        return false;
    };

    match (price_token(&business.price_range), price_token(&range.range)) {
        (Some(business_price), Some(range_price)) => (business_price - range_price).abs() <= 10,
        _ => false,
    }
}

/// First `$<digits>` token of a price string, if any.
pub fn price_token(price: &str) -> Option<i64> {
    let re = Regex::new(r"\$(\d+)").unwrap();

    re.captures(price)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(id: &str, category: &str, location: &str, price_range: &str) -> Business {
        Business {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            location: location.to_string(),
            price_range: price_range.to_string(),
            rating: 4.5,
            ..Business::default()
        }
    }

    fn bands() -> Vec<PriceRange> {
        vec![
            PriceRange {
                id: "budget".to_string(),
                label: "Budget".to_string(),
                range: "$15-25 per person".to_string(),
            },
            PriceRange {
                id: "mid".to_string(),
                label: "Mid-range".to_string(),
                range: "$55 per person".to_string(),
            },
            PriceRange {
                id: "upscale".to_string(),
                label: "Upscale".to_string(),
                range: "$65 and up".to_string(),
            },
        ]
    }

    #[test]
    fn test_all_selections_identity() {
        let businesses = vec![
            business("a", "bars", "Downtown", "$20"),
            business("b", "golf", "Island Park", "$80"),
            business("c", "spas", "North Beach Road", "$150"),
        ];

        let matched = filter(&businesses, &FilterSelection::default(), &bands());

        assert_eq!(matched.len(), businesses.len());
        assert_eq!(matched[0].id, "a");
        assert_eq!(matched[1].id, "b");
        assert_eq!(matched[2].id, "c");
    }

    #[test]
    fn test_category_exact_match() {
        let businesses = vec![
            business("a", "bars", "Downtown", "$20"),
            business("b", "barbershops", "Downtown", "$20"),
        ];

        let matched = filter(
            &businesses,
            &FilterSelection::new("bars", ALL, ALL),
            &bands(),
        );

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "a");
    }

    #[test]
    fn test_location_substring_case_insensitive() {
        let businesses = vec![
            business("a", "bars", "North Beach Road", "$20"),
            business("b", "bars", "Downtown", "$20"),
        ];

        let matched = filter(
            &businesses,
            &FilterSelection::new(ALL, "beach", ALL),
            &bands(),
        );

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "a");
    }

    #[test]
    fn test_price_within_tolerance() {
        let businesses = vec![business("a", "bars", "Downtown", "$50")];

        // $50 against the $55 band: diff 5, matches
        let matched = filter(&businesses, &FilterSelection::new(ALL, ALL, "mid"), &bands());
        assert_eq!(matched.len(), 1);

        // $50 against the $65 band: diff 15, does not match
        let matched = filter(
            &businesses,
            &FilterSelection::new(ALL, ALL, "upscale"),
            &bands(),
        );
        assert!(matched.is_empty());
    }

    #[test]
    fn test_price_unparseable_never_matches() {
        let businesses = vec![
            business("a", "bars", "Downtown", "Varies"),
            business("b", "bars", "Downtown", "$55"),
        ];

        let matched = filter(&businesses, &FilterSelection::new(ALL, ALL, "mid"), &bands());

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "b");
    }

    #[test]
    fn test_price_unknown_band_never_matches() {
        let businesses = vec![business("a", "bars", "Downtown", "$55")];

        let matched = filter(
            &businesses,
            &FilterSelection::new(ALL, ALL, "nonexistent"),
            &bands(),
        );

        assert!(matched.is_empty());
    }

    #[test]
    fn test_filters_combine() {
        let businesses = vec![
            business("a", "bars", "North Beach Road", "$50"),
            business("b", "bars", "North Beach Road", "$90"),
            business("c", "golf", "North Beach Road", "$50"),
        ];

        let matched = filter(
            &businesses,
            &FilterSelection::new("bars", "beach", "mid"),
            &bands(),
        );

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "a");
    }

    #[test]
    fn test_listing_no_results() {
        let businesses = vec![business("a", "bars", "Downtown", "$20")];

        let result = listing(
            &businesses,
            &FilterSelection::new("golf", ALL, ALL),
            &bands(),
        );

        assert_eq!(result, Listing::NoResults);
    }

    #[test]
    fn test_price_token() {
        assert_eq!(price_token("$40-60 per person"), Some(40));
        assert_eq!(price_token("around $25"), Some(25));
        assert_eq!(price_token("free"), None);
        assert_eq!(price_token(""), None);
    }
}
