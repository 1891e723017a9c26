use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use catalog::model::Business;

use crate::{
    database::{self, User, VibeRecord, VIBE_LOCK_SECONDS, VOTE_LOCK_SECONDS},
    error::AppError,
    search,
    state::AppState,
    utils::{client_ip, derive_score, validate_vibe_text},
};

type AppResult = Result<Json<Value>, AppError>;

/// The merged dataset the category pages filter over: businesses plus the
/// category, location, and price-band option lists.
pub async fn catalog_handler(State(state): State<Arc<AppState>>) -> AppResult {
    Ok(Json(serde_json::to_value(&state.catalog)?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreParams {
    business_id: String,
}

pub async fn vibe_score_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScoreParams>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let vote_count = database::vote_count(&mut con, &params.business_id).await?;
    let (score, source) = derive_score(vote_count);

    Ok(Json(json!({
        "score": score,
        "vote_count": vote_count.unwrap_or(0),
        "source": source,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    business_id: String,
    #[serde(default)]
    location: String,
}

pub async fn vote_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<VotePayload>,
) -> AppResult {
    if payload.business_id.trim().is_empty() {
        return Err(AppError::MalformedPayload);
    }

    let mut con = state.redis_connection.clone();

    let lock = format!("vote:{}:{}", client_ip(&headers), payload.business_id);
    if !database::acquire_lock(&mut con, &lock, VOTE_LOCK_SECONDS).await? {
        return Err(AppError::RateLimited {
            message: "You can only vote once per business per day.".to_string(),
        });
    }

    let vote_count = database::increment_vote(&mut con, &payload.business_id).await?;
    info!(
        "Vote recorded for {} from {}",
        payload.business_id, payload.location
    );

    Ok(Json(json!({
        "success": true,
        "message": "Vote recorded",
        "vote_count": vote_count,
    })))
}

#[derive(Deserialize)]
pub struct VibePayload {
    vibe_text: String,
    #[serde(default)]
    persona_demographic: String,
    #[serde(default)]
    persona_activity: String,
    #[serde(default)]
    persona_style: String,
    #[serde(default)]
    category: String,
}

pub async fn vibes_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<VibePayload>,
) -> AppResult {
    validate_vibe_text(&payload.vibe_text)?;

    let mut con = state.redis_connection.clone();

    let lock = format!("vibe:{}", client_ip(&headers));
    if !database::acquire_lock(&mut con, &lock, VIBE_LOCK_SECONDS).await? {
        return Err(AppError::RateLimited {
            message: "You can only submit one vibe per hour. Try again later!".to_string(),
        });
    }

    database::push_vibe(
        &mut con,
        &VibeRecord {
            vibe_text: payload.vibe_text.trim().to_string(),
            persona_demographic: payload.persona_demographic,
            persona_activity: payload.persona_activity,
            persona_style: payload.persona_style,
            category: payload.category,
            submitted_at: Utc::now().to_rfc3339(),
        },
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Vibe received",
    })))
}

pub async fn businesses_handler(State(state): State<Arc<AppState>>) -> AppResult {
    let mut con = state.redis_connection.clone();
    let businesses = database::all_businesses(&mut con).await?;

    Ok(Json(json!(businesses)))
}

pub async fn businesses_by_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let businesses: Vec<Business> = database::all_businesses(&mut con)
        .await?
        .into_iter()
        .filter(|business| business.category.eq_ignore_ascii_case(&category))
        .collect();

    Ok(Json(json!(businesses)))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult {
    let hits = search::search_businesses(&state.meili_client, &params.q).await?;

    // resolve hits back to full records, keeping the engine's ranking
    let mut con = state.redis_connection.clone();
    let mut businesses = Vec::with_capacity(hits.len());
    for hit in hits {
        if let Some(business) = database::get_business(&mut con, &hit.id).await? {
            businesses.push(business);
        }
    }

    Ok(Json(json!(businesses)))
}

pub async fn create_business_handler(
    State(state): State<Arc<AppState>>,
    Json(mut business): Json<Business>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if business.name.trim().is_empty() || business.category.trim().is_empty() {
        return Err(AppError::Invalid(
            "Name and category are required".to_string(),
        ));
    }

    if business.id.is_empty() {
        business.id = Uuid::new_v4().to_string();
    }

    let mut con = state.redis_connection.clone();
    database::put_business(&mut con, &business).await?;

    let votes = database::vote_count(&mut con, &business.id)
        .await?
        .unwrap_or(0);
    search::upsert_business(&state.meili_client, &business, votes).await?;

    Ok((StatusCode::CREATED, Json(json!(business))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUpdate {
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
    rating: Option<f64>,
    location: Option<String>,
    price_range: Option<String>,
    tags: Option<Vec<String>>,
}

pub async fn update_business_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<BusinessUpdate>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let mut business = database::get_business(&mut con, &id)
        .await?
        .ok_or(AppError::NotFound("Business"))?;

    if let Some(name) = update.name {
        business.name = name;
    }
    if let Some(category) = update.category {
        business.category = category;
    }
    if let Some(description) = update.description {
        business.description = description;
    }
    if let Some(rating) = update.rating {
        business.rating = rating;
    }
    if let Some(location) = update.location {
        business.location = location;
    }
    if let Some(price_range) = update.price_range {
        business.price_range = price_range;
    }
    if let Some(tags) = update.tags {
        business.tags = tags;
    }

    database::put_business(&mut con, &business).await?;

    let votes = database::vote_count(&mut con, &id).await?.unwrap_or(0);
    search::upsert_business(&state.meili_client, &business, votes).await?;

    Ok(Json(json!(business)))
}

pub async fn delete_business_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let business = database::get_business(&mut con, &id)
        .await?
        .ok_or(AppError::NotFound("Business"))?;

    database::delete_business(&mut con, &id).await?;
    search::remove_business(&state.meili_client, &id).await?;

    Ok(Json(json!({
        "message": "Business deleted",
        "business": business,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    display_name: Option<String>,
    email: Option<String>,
}

pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Invalid(
            "Username and password are required".to_string(),
        ));
    }

    let mut con = state.redis_connection.clone();

    if database::username_taken(&mut con, &payload.username).await? {
        return Err(AppError::Invalid("Username already taken".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, 10)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: payload.username,
        password_hash,
        display_name: payload.display_name,
        email: payload.email,
        favorites: Vec::new(),
        created_at: Utc::now().to_rfc3339(),
    };
    database::put_user(&mut con, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created",
            "user": { "id": user.id, "username": user.username },
        })),
    ))
}

#[derive(Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> AppResult {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Invalid(
            "Username and password are required".to_string(),
        ));
    }

    let mut con = state.redis_connection.clone();

    // same answer for an unknown user and a wrong password
    let credentials_error = || AppError::Invalid("Invalid username or password".to_string());

    let user = database::get_user_by_username(&mut con, &payload.username)
        .await?
        .ok_or_else(credentials_error)?;

    if !bcrypt::verify(&payload.password, &user.password_hash)? {
        return Err(credentials_error());
    }

    Ok(Json(json!({
        "message": "Login successful",
        "user": {
            "id": user.id,
            "username": user.username,
            "displayName": user.display_name,
            "email": user.email,
        },
    })))
}

pub async fn add_favorite_handler(
    State(state): State<Arc<AppState>>,
    Path((user_id, business_id)): Path<(String, String)>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let mut user = database::get_user_by_id(&mut con, &user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    // duplicate add is a no-op, order of first addition is kept
    if !user.favorites.contains(&business_id) {
        user.favorites.push(business_id);
        database::put_user(&mut con, &user).await?;
    }

    Ok(Json(json!({
        "message": "Business added to favorites",
        "favorites": user.favorites,
    })))
}

pub async fn remove_favorite_handler(
    State(state): State<Arc<AppState>>,
    Path((user_id, business_id)): Path<(String, String)>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let mut user = database::get_user_by_id(&mut con, &user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    user.favorites.retain(|favorite| favorite != &business_id);
    database::put_user(&mut con, &user).await?;

    Ok(Json(json!({
        "message": "Business removed from favorites",
        "favorites": user.favorites,
    })))
}

pub async fn favorites_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult {
    let mut con = state.redis_connection.clone();

    let user = database::get_user_by_id(&mut con, &user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    // populated, in the order they were favorited
    let mut favorites = Vec::with_capacity(user.favorites.len());
    for business_id in &user.favorites {
        if let Some(business) = database::get_business(&mut con, business_id).await? {
            favorites.push(business);
        }
    }

    Ok(Json(json!({ "favorites": favorites })))
}
