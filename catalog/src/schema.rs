//! Schema.org structured data for category pages.
//!
//! Pure builders over a filtered subset: the page layer injects the returned
//! JSON into `application/ld+json` script tags. Kept free of any rendering
//! concerns so the output can be asserted on directly.
use serde_json::{json, Value};

use crate::model::Business;

pub fn faq_page(businesses: &[&Business]) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": businesses
            .iter()
            .filter_map(|business| {
                let question = business.question.as_ref()?;

                Some(json!({
                    "@type": "Question",
                    "name": question,
                    "acceptedAnswer": {
                        "@type": "Answer",
                        "text": format!(
                            "Recommended: {}. {}",
                            business.name, business.description
                        ),
                    },
                }))
            })
            .collect::<Vec<_>>(),
    })
}

pub fn item_list(businesses: &[&Business]) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "itemListElement": businesses
            .iter()
            .enumerate()
            .map(|(index, business)| {
                json!({
                    "@type": "ListItem",
                    "position": index + 1,
                    "item": {
                        "@type": "LocalBusiness",
                        "name": business.name,
                        "description": business.description,
                        "url": business.contact.website.clone().unwrap_or_default(),
                        "telephone": business.contact.phone.clone().unwrap_or_default(),
                        "address": business.contact.address.as_ref().map_or_else(
                            || json!({}),
                            |address| json!({
                                "@type": "PostalAddress",
                                "streetAddress": address,
                            }),
                        ),
                        "aggregateRating": {
                            "@type": "AggregateRating",
                            "ratingValue": business.rating,
                            "reviewCount": 1,
                        },
                    },
                })
            })
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contact;

    fn business(name: &str, question: Option<&str>) -> Business {
        Business {
            id: name.to_lowercase(),
            name: name.to_string(),
            category: "bars".to_string(),
            description: "A spot worth knowing.".to_string(),
            rating: 4.0,
            question: question.map(str::to_string),
            contact: Contact {
                website: Some("https://example.com".to_string()),
                phone: None,
                address: Some("1 Main St".to_string()),
            },
            ..Business::default()
        }
    }

    #[test]
    fn test_faq_skips_questionless_entries() {
        let with = business("Alpha", Some("Where to start the night?"));
        let without = business("Beta", None);
        let page = faq_page(&[&with, &without]);

        let entities = page["mainEntity"].as_array().unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["name"], "Where to start the night?");
    }

    #[test]
    fn test_item_list_positions_follow_input_order() {
        let first = business("Alpha", None);
        let second = business("Beta", None);
        let list = item_list(&[&first, &second]);

        let items = list["itemListElement"].as_array().unwrap();
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[0]["item"]["name"], "Alpha");
        assert_eq!(items[1]["position"], 2);
        assert_eq!(items[1]["item"]["address"]["streetAddress"], "1 Main St");
    }
}
