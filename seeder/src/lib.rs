//! # Catalog Seeder
//!
//! Merges the per-category dataset files into the single catalog artifact
//! the server loads at startup.
//!
//! ## Flow
//! 1. Walk the category configuration table. A deployment does not have to
//!    ship every category; missing files are counted and skipped.
//! 2. Sanitize free-text fields and derive ids for records without one.
//! 3. Dedup businesses, categories, locations, and price bands across
//!    files. First occurrence wins, input order is preserved.
//! 4. Write `catalog.json`.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Error};
use indicatif::{ProgressBar, ProgressStyle};

use catalog::model::Catalog;
use catalog::{get_catalog, write_catalog};

pub mod models;
pub mod utils;

use models::CATEGORY_CONFIGS;
use utils::{sanitize, slugify};

#[derive(Debug, Default)]
pub struct MergeStats {
    pub businesses: usize,
    pub categories: usize,
    pub locations: usize,
    pub price_ranges: usize,
    pub skipped_files: usize,
}

pub fn run(data_dir: &str, out_path: &str) -> Result<MergeStats, Error> {
    let (merged, stats) = merge_catalog(data_dir)?;

    write_catalog(out_path, &merged)
        .with_context(|| format!("writing catalog artifact to {out_path}"))?;

    println!("Merged Businesses: {}", stats.businesses);
    println!("Merged Locations: {}", stats.locations);
    println!("Merged Price Bands: {}", stats.price_ranges);

    if stats.skipped_files > 0 {
        println!("Skipped Files: {}", stats.skipped_files);
    }

    Ok(stats)
}

pub fn merge_catalog(data_dir: &str) -> Result<(Catalog, MergeStats), Error> {
    let mut merged = Catalog::default();
    let mut stats = MergeStats::default();
    let mut seen = Seen::default();

    let pb = ProgressBar::new(CATEGORY_CONFIGS.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    for config in CATEGORY_CONFIGS {
        pb.set_message(format!("Merging {}", config.id));

        let path = Path::new(data_dir).join(config.data_file);
        if !path.exists() {
            stats.skipped_files += 1;
            pb.inc(1);
            continue;
        }

        let dataset = get_catalog(&path.to_string_lossy())
            .with_context(|| format!("reading dataset {}", config.data_file))?;

        merge_dataset(&mut merged, &mut seen, dataset);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    stats.businesses = merged.businesses.len();
    stats.categories = merged.categories.len();
    stats.locations = merged.locations.len();
    stats.price_ranges = merged.price_ranges.len();

    Ok((merged, stats))
}

#[derive(Default)]
struct Seen {
    businesses: HashSet<String>,
    categories: HashSet<String>,
    locations: HashSet<String>,
    price_ranges: HashSet<String>,
}

fn merge_dataset(merged: &mut Catalog, seen: &mut Seen, dataset: Catalog) {
    for mut business in dataset.businesses {
        if business.id.is_empty() {
            business.id = slugify(&business.name);
        }
        business.location = sanitize(&business.location);

        if seen.businesses.insert(business.id.clone()) {
            merged.businesses.push(business);
        } else {
            #[cfg(feature = "verbose")]
            println!("Duplicate business! {}", business.id);
        }
    }

    for category in dataset.categories {
        if seen.categories.insert(category.id.clone()) {
            merged.categories.push(category);
        }
    }

    for location in dataset.locations {
        let location = sanitize(&location);
        if location.is_empty() {
            continue;
        }

        if seen.locations.insert(location.to_lowercase()) {
            merged.locations.push(location);
        }
    }

    for band in dataset.price_ranges {
        if seen.price_ranges.insert(band.id.clone()) {
            merged.price_ranges.push(band);
        }
    }
}
