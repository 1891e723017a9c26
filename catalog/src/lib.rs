//! # Catalog
//!
//! Shared data model for the city directory.
//!
//! The catalog is a single JSON artifact produced by the `seeder` crate and
//! consumed by the `server` at startup. It merges every category page's
//! dataset: business records, the category list, known locations, and the
//! price bands used for coarse filtering.
//!
//! ## Artifact
//! - One file, `catalog.json`, served from the repo or a remote URL
//! - Businesses carry their category so a single artifact covers all pages
//! - Business records are immutable once loaded for a page session; the
//!   filter only reads them
use std::fs;

use anyhow::Error;
use reqwest::get;

pub mod filter;
pub mod model;
pub mod schema;

use model::Catalog;

pub fn get_catalog(path: &str) -> Result<Catalog, Error> {
    let data = fs::read(path)?;

    Ok(serde_json::from_slice(&data)?)
}

pub async fn get_catalog_remote(url: &str) -> Result<Catalog, Error> {
    let response = get(url).await?;
    let bytes = response.bytes().await?;

    Ok(serde_json::from_slice(&bytes)?)
}

pub fn write_catalog(path: &str, catalog: &Catalog) -> Result<(), Error> {
    fs::write(path, serde_json::to_vec_pretty(catalog)?)?;

    Ok(())
}
