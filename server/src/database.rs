//! # Redis
//!
//! RAM database.
//!
//! Core store for everything mutable: vote counts, rate-limit locks, user
//! accounts with their favorites, vibe submissions, and the business records
//! themselves (seeded from the catalog artifact, then mutated by the admin
//! CRUD routes).
//!
//! ## Requirements
//!
//! - Fast lookups, atomic increments for vote counts
//! - Small dataset: hundreds of businesses, thousands of users
//! - Rate-limit locks must expire on their own
//!
//! ## Implementation
//!
//! - One hash per record kind, field = identifier, value = JSON blob
//! - `votes` hash: id to 32-bit count, HINCRBY keeps it atomic
//! - Locks via SET NX EX, so a held lock answers the rate-limit question
//!   and expiry needs no sweeper
//! - Users are stored by username with an id-to-username index hash, since
//!   login looks up by name and every other route looks up by id
use std::collections::HashMap;
use std::time::Duration;

use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use serde::{Deserialize, Serialize};

use catalog::model::{Business, Catalog};

use crate::error::AppError;

pub const BUSINESS_HASH: &str = "businesses";
pub const VOTES_HASH: &str = "votes";
pub const USERS_HASH: &str = "users";
pub const USER_IDS_HASH: &str = "user_ids";
pub const VIBES_LIST: &str = "vibes";

pub const VOTE_LOCK_SECONDS: u64 = 86_400;
pub const VIBE_LOCK_SECONDS: u64 = 3_600;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub favorites: Vec<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VibeRecord {
    pub vibe_text: String,
    pub persona_demographic: String,
    pub persona_activity: String,
    pub persona_style: String,
    pub category: String,
    pub submitted_at: String,
}

pub async fn init_redis(
    redis_url: &str,
    catalog: &Catalog,
) -> (ConnectionManager, HashMap<String, i64>) {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let mut connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    let vote_counts = seed_businesses(&mut connection_manager, catalog)
        .await
        .unwrap();

    (connection_manager, vote_counts)
}

// Seeds only records the store does not already hold, so admin edits survive
// restarts. Returns the current vote count per catalog business for the
// search index.
async fn seed_businesses(
    con: &mut ConnectionManager,
    catalog: &Catalog,
) -> Result<HashMap<String, i64>, AppError> {
    let mut vote_counts = HashMap::new();

    for business in &catalog.businesses {
        let blob = serde_json::to_string(business)?;
        let _: bool = con.hset_nx(BUSINESS_HASH, &business.id, blob).await?;

        let count: Option<i64> = con.hget(VOTES_HASH, &business.id).await?;
        vote_counts.insert(business.id.clone(), count.unwrap_or(0));
    }

    Ok(vote_counts)
}

pub async fn vote_count(
    con: &mut ConnectionManager,
    business_id: &str,
) -> Result<Option<i64>, AppError> {
    Ok(con.hget(VOTES_HASH, business_id).await?)
}

pub async fn increment_vote(
    con: &mut ConnectionManager,
    business_id: &str,
) -> Result<i64, AppError> {
    Ok(con.hincr(VOTES_HASH, business_id, 1).await?)
}

/// SET NX EX. `true` means the lock was free and is now held for `ttl`.
pub async fn acquire_lock(
    con: &mut ConnectionManager,
    key: &str,
    ttl_seconds: u64,
) -> Result<bool, AppError> {
    let acquired: Option<String> = redis::cmd("SET")
        .arg(key)
        .arg(1)
        .arg("NX")
        .arg("EX")
        .arg(ttl_seconds)
        .query_async(con)
        .await?;

    Ok(acquired.is_some())
}

pub async fn get_business(
    con: &mut ConnectionManager,
    business_id: &str,
) -> Result<Option<Business>, AppError> {
    let blob: Option<String> = con.hget(BUSINESS_HASH, business_id).await?;

    match blob {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

pub async fn all_businesses(con: &mut ConnectionManager) -> Result<Vec<Business>, AppError> {
    let blobs: HashMap<String, String> = con.hgetall(BUSINESS_HASH).await?;

    let mut businesses = blobs
        .into_values()
        .map(|blob| serde_json::from_str(&blob))
        .collect::<Result<Vec<Business>, _>>()?;

    // hash iteration order is arbitrary; keep responses stable
    businesses.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(businesses)
}

pub async fn put_business(
    con: &mut ConnectionManager,
    business: &Business,
) -> Result<(), AppError> {
    let blob = serde_json::to_string(business)?;
    let _: () = con.hset(BUSINESS_HASH, &business.id, blob).await?;

    Ok(())
}

pub async fn delete_business(
    con: &mut ConnectionManager,
    business_id: &str,
) -> Result<(), AppError> {
    let _: () = con.hdel(BUSINESS_HASH, business_id).await?;

    Ok(())
}

pub async fn push_vibe(con: &mut ConnectionManager, vibe: &VibeRecord) -> Result<(), AppError> {
    let blob = serde_json::to_string(vibe)?;
    let _: () = con.lpush(VIBES_LIST, blob).await?;

    Ok(())
}

pub async fn username_taken(
    con: &mut ConnectionManager,
    username: &str,
) -> Result<bool, AppError> {
    Ok(con.hexists(USERS_HASH, username).await?)
}

pub async fn get_user_by_username(
    con: &mut ConnectionManager,
    username: &str,
) -> Result<Option<User>, AppError> {
    let blob: Option<String> = con.hget(USERS_HASH, username).await?;

    match blob {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

pub async fn get_user_by_id(
    con: &mut ConnectionManager,
    user_id: &str,
) -> Result<Option<User>, AppError> {
    let username: Option<String> = con.hget(USER_IDS_HASH, user_id).await?;

    match username {
        Some(username) => get_user_by_username(con, &username).await,
        None => Ok(None),
    }
}

pub async fn put_user(con: &mut ConnectionManager, user: &User) -> Result<(), AppError> {
    let blob = serde_json::to_string(user)?;
    let _: () = con.hset(USERS_HASH, &user.username, blob).await?;
    let _: () = con.hset(USER_IDS_HASH, &user.id, &user.username).await?;

    Ok(())
}
