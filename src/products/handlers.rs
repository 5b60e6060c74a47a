use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    products::{
        dto::{ListQuery, ProductCreate, ProductUpdate},
        repo::Product,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/search/:name", get(search_products))
}

#[instrument(skip(state, _user, payload))]
async fn create_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload.validate()?;
    let product = Product::create(
        &state.db,
        &payload.name,
        payload.description.as_deref(),
        payload.price,
        payload.stock,
        payload.is_active,
    )
    .await?;
    info!(product_id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Public listing; only active rows, ordered by id. An empty page is a
/// normal 200 with `[]`.
#[instrument(skip(state))]
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    query.validate()?;
    let products = Product::list(&state.db, query.skip, query.limit).await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(Json(product))
}

#[instrument(skip(state, _user, patch))]
async fn update_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    patch.validate()?;

    let mut tx = state.db.begin().await?;
    let mut product = Product::find_for_update(&mut tx, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    if let Some(name) = patch.name {
        product.name = name;
    }
    if let Some(description) = patch.description {
        product.description = Some(description);
    }
    if let Some(price) = patch.price {
        product.price = price;
    }
    if let Some(stock) = patch.stock {
        product.stock = stock;
    }
    if let Some(is_active) = patch.is_active {
        product.is_active = is_active;
    }

    let updated = product.save(&mut tx).await?;
    tx.commit().await?;
    Ok(Json(updated))
}

/// Soft delete: the row stays, is_active flips to false. Deleting an
/// already-inactive product answers 204 again; only an id that never
/// existed is a 404.
#[instrument(skip(state, _user))]
async fn delete_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut tx = state.db.begin().await?;
    let deleted = Product::soft_delete(&mut tx, id).await?;
    tx.commit().await?;
    if !deleted {
        return Err(ApiError::NotFound("product"));
    }
    info!(product_id = id, "product soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Name search is an acknowledged stub: the matching semantics (substring
/// vs prefix, case folding) are still undecided upstream, so this always
/// answers with an empty list rather than guessing.
#[instrument]
async fn search_products(Path(_name): Path<String>) -> Json<Vec<Product>> {
    Json(Vec::new())
}
