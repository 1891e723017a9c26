//! # Meilisearch
//!
//! Search engine behind `/api/search`.
//!
//! ## Schema
//! - One index for all businesses
//! - Fields: name and description (**searchable**), category and location
//!   (**filterable**), votes and rating (**sortable**)
//!
//! ## Proxy
//! The frontend never talks to Meilisearch directly; queries go through the
//! backend, which resolves hits back to full business records from Redis so
//! search results carry the same shape as every other business response.
use std::collections::HashMap;
use std::sync::Arc;

use meilisearch_sdk::{
    client::Client,
    settings::{MinWordSizeForTypos, Settings, TypoToleranceSettings},
};
use serde::{Deserialize, Serialize};

use catalog::model::{Business, Catalog};

use crate::error::AppError;

pub const BUSINESS_INDEX: &str = "businesses";
pub const BUSINESS_ID: &str = "id";
pub const BUSINESS_NAME: &str = "name";
pub const BUSINESS_DESCRIPTION: &str = "description";
pub const BUSINESS_CATEGORY: &str = "category";
pub const BUSINESS_LOCATION: &str = "location";
pub const BUSINESS_VOTES: &str = "votes";
pub const BUSINESS_RATING: &str = "rating";

#[derive(Serialize, Deserialize)]
pub struct MeiliBusiness {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub rating: f64,
    pub votes: i64,
}

impl MeiliBusiness {
    pub fn from_business(business: &Business, votes: i64) -> Self {
        Self {
            id: business.id.clone(),
            name: business.name.clone(),
            description: business.description.clone(),
            category: business.category.clone(),
            location: business.location.clone(),
            rating: business.rating,
            votes,
        }
    }
}

pub async fn init_meilisearch(
    meili_url: &str,
    meili_admin_key: &str,
    catalog: &Catalog,
    vote_counts: &HashMap<String, i64>,
) -> Arc<Client> {
    let meili_client = Arc::new(Client::new(meili_url, Some(meili_admin_key)).unwrap());

    let documents: Vec<MeiliBusiness> = catalog
        .businesses
        .iter()
        .map(|business| {
            MeiliBusiness::from_business(
                business,
                *vote_counts.get(&business.id).unwrap_or(&0),
            )
        })
        .collect();

    meili_client
        .index(BUSINESS_INDEX)
        .set_settings(&init_settings())
        .await
        .unwrap();

    upsert_items(meili_client.clone(), BUSINESS_INDEX, &documents, BUSINESS_ID).await;

    meili_client
}

async fn upsert_items<T>(meili_client: Arc<Client>, index_name: &str, items: &[T], id_name: &str)
where
    T: Serialize + Send + Sync,
{
    let _result = meili_client
        .index(index_name)
        .add_or_update(items, Some(id_name))
        .await
        .unwrap()
        .wait_for_completion(&meili_client, None, None)
        .await
        .unwrap();

    #[cfg(feature = "verbose")]
    println!("Meili task result: {:?}", _result);
}

/// Request-path upsert: fire and forget, the index catches up on its own.
pub async fn upsert_business(
    meili_client: &Client,
    business: &Business,
    votes: i64,
) -> Result<(), AppError> {
    meili_client
        .index(BUSINESS_INDEX)
        .add_or_update(
            &[MeiliBusiness::from_business(business, votes)],
            Some(BUSINESS_ID),
        )
        .await?;

    Ok(())
}

pub async fn remove_business(meili_client: &Client, business_id: &str) -> Result<(), AppError> {
    meili_client
        .index(BUSINESS_INDEX)
        .delete_document(business_id)
        .await?;

    Ok(())
}

pub async fn search_businesses(
    meili_client: &Client,
    query: &str,
) -> Result<Vec<MeiliBusiness>, AppError> {
    let results = meili_client
        .index(BUSINESS_INDEX)
        .search()
        .with_query(query)
        .execute::<MeiliBusiness>()
        .await?;

    Ok(results.hits.into_iter().map(|hit| hit.result).collect())
}

fn init_settings() -> Settings {
    Settings::new()
        .with_ranking_rules([
            "words",
            "typo",
            "proximity",
            "exactness",
            "attribute",
            "sort",
        ])
        .with_filterable_attributes([BUSINESS_CATEGORY, BUSINESS_LOCATION])
        .with_searchable_attributes([BUSINESS_NAME, BUSINESS_DESCRIPTION])
        .with_sortable_attributes([BUSINESS_VOTES, BUSINESS_RATING])
        .with_typo_tolerance(TypoToleranceSettings {
            enabled: Some(true),
            disable_on_attributes: None,
            disable_on_words: None,
            min_word_size_for_typos: Some(MinWordSizeForTypos {
                one_typo: Some(5),
                two_typos: Some(9),
            }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_mapping() {
        let business = Business {
            id: "dockside".to_string(),
            name: "Dockside".to_string(),
            category: "bars".to_string(),
            location: "North Beach Road".to_string(),
            description: "Sunset drinks on the water.".to_string(),
            rating: 4.5,
            ..Business::default()
        };

        let document = MeiliBusiness::from_business(&business, 12);

        assert_eq!(document.id, "dockside");
        assert_eq!(document.votes, 12);
        assert_eq!(document.location, "North Beach Road");
    }
}
