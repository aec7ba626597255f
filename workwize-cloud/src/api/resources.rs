//! List/get routes over the cached tables, plus the two local edits
//!
//! Every list takes `offset`/`limit` and a fixed set of exact-match filters;
//! anything else in the query string is a 400.

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::AppError;
use shared::models::{Address, Asset, Country, Employee, Offboard, Office, Order, Product, Warehouse};
use shared::request::PageRequest;
use shared::response::Page;
use shared::util::now_millis;
use validator::Validate;

use crate::db::listing::Filter;
use crate::db::{addresses, assets, countries, employees, offboards, offices, orders, products, warehouses};
use crate::pii;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{ValidJson, ValidQuery};

/// Filters for the text columns that were supplied
fn text_filters(pairs: &[(&'static str, &Option<String>)]) -> Vec<Filter> {
    pairs
        .iter()
        .filter_map(|&(column, value)| value.as_ref().map(|v| Filter::text(column, v.clone())))
        .collect()
}

// ── Employees ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub office_id: Option<String>,
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<EmployeeQuery>,
) -> ApiResult<Page<Employee>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[
        ("status", &q.status),
        ("department", &q.department),
        ("office_id", &q.office_id),
    ]);
    let (items, total) = employees::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    let row = employees::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee"))?;
    Ok(ApiResponse::success(row))
}

// ── Assets ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub assigned_to_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub office_id: Option<String>,
    pub product_id: Option<String>,
}

/// GET /api/assets
pub async fn list_assets(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<AssetQuery>,
) -> ApiResult<Page<Asset>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[
        ("status", &q.status),
        ("category", &q.category),
        ("assigned_to_id", &q.assigned_to_id),
        ("warehouse_id", &q.warehouse_id),
        ("office_id", &q.office_id),
        ("product_id", &q.product_id),
    ]);
    let (items, total) = assets::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/assets/{id}
pub async fn get_asset(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Asset> {
    let row = assets::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Asset"))?;
    Ok(ApiResponse::success(row))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AssetPatch {
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// PATCH /api/assets/{id}
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<AssetPatch>,
) -> ApiResult<Asset> {
    if body.status.is_none() && body.notes.is_none() {
        return Err(AppError::validation("Nothing to update").into());
    }
    let notes = scrubbed_notes(body.notes.as_deref())?;

    let row = assets::update(
        &state.pool,
        &id,
        body.status.as_deref(),
        notes.as_deref(),
        now_millis(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Asset"))?;

    tracing::info!(asset_id = %id, "Asset updated locally");
    Ok(ApiResponse::success(row))
}

/// Run edited notes through the free-text scrubber; refuse the edit if it cannot run.
fn scrubbed_notes(notes: Option<&str>) -> Result<Option<String>, AppError> {
    notes
        .map(|n| pii::scrub_text(n, &[]).ok_or_else(|| AppError::internal("Notes could not be scrubbed")))
        .transpose()
}

// ── Orders ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub employee_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub currency: Option<String>,
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<OrderQuery>,
) -> ApiResult<Page<Order>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[
        ("status", &q.status),
        ("employee_id", &q.employee_id),
        ("warehouse_id", &q.warehouse_id),
        ("currency", &q.currency),
    ]);
    let (items, total) = orders::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/orders/{id}
pub async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Order> {
    let row = orders::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(row))
}

// ── Products ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub status: Option<String>,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<ProductQuery>,
) -> ApiResult<Page<Product>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[
        ("category", &q.category),
        ("manufacturer", &q.manufacturer),
        ("status", &q.status),
    ]);
    let (items, total) = products::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let row = products::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success(row))
}

// ── Warehouses ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub warehouse_type: Option<String>,
}

/// GET /api/warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<WarehouseQuery>,
) -> ApiResult<Page<Warehouse>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[
        ("status", &q.status),
        ("warehouse_type", &q.warehouse_type),
    ]);
    let (items, total) = warehouses::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/warehouses/{id}
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Warehouse> {
    let row = warehouses::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Warehouse"))?;
    Ok(ApiResponse::success(row))
}

// ── Offices ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfficeQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// GET /api/offices
pub async fn list_offices(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<OfficeQuery>,
) -> ApiResult<Page<Office>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[("status", &q.status)]);
    let (items, total) = offices::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/offices/{id}
pub async fn get_office(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Office> {
    let row = offices::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Office"))?;
    Ok(ApiResponse::success(row))
}

// ── Offboards ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffboardQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub employee_id: Option<String>,
    pub returned_assets: Option<bool>,
}

/// GET /api/offboards
pub async fn list_offboards(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<OffboardQuery>,
) -> ApiResult<Page<Offboard>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let mut filters = text_filters(&[("status", &q.status), ("employee_id", &q.employee_id)]);
    if let Some(returned) = q.returned_assets {
        filters.push(Filter::bool("returned_assets", returned));
    }
    let (items, total) = offboards::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/offboards/{id}
pub async fn get_offboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Offboard> {
    let row = offboards::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Offboard"))?;
    Ok(ApiResponse::success(row))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OffboardPatch {
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
    pub returned_assets: Option<bool>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// PATCH /api/offboards/{id}
pub async fn update_offboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<OffboardPatch>,
) -> ApiResult<Offboard> {
    if body.status.is_none() && body.returned_assets.is_none() && body.notes.is_none() {
        return Err(AppError::validation("Nothing to update").into());
    }
    let notes = scrubbed_notes(body.notes.as_deref())?;

    let row = offboards::update(
        &state.pool,
        &id,
        body.status.as_deref(),
        body.returned_assets,
        notes.as_deref(),
        now_millis(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Offboard"))?;

    tracing::info!(offboard_id = %id, "Offboard updated locally");
    Ok(ApiResponse::success(row))
}

// ── Addresses ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// GET /api/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<AddressQuery>,
) -> ApiResult<Page<Address>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[("country", &q.country), ("city", &q.city)]);
    let (items, total) = addresses::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}

/// GET /api/addresses/{id}
pub async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Address> {
    let row = addresses::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Address"))?;
    Ok(ApiResponse::success(row))
}

// ── Countries ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub code: Option<String>,
}

/// GET /api/countries
pub async fn list_countries(
    State(state): State<AppState>,
    ValidQuery(q): ValidQuery<CountryQuery>,
) -> ApiResult<Page<Country>> {
    let page = PageRequest::new(q.offset, q.limit)?;
    let filters = text_filters(&[("code", &q.code)]);
    let (items, total) = countries::list(&state.pool, &filters, page).await?;
    Ok(ApiResponse::success(Page::new(items, total, page)))
}
