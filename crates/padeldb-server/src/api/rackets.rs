use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use padeldb_core::{
    filter_by_price, paginate, sort_by_price, CatalogFilters, CatalogStats, NormalizedRacket,
    Pagination, ResolvedPrice, SortField, SortOptions, SortOrder,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState};

const SEARCH_LIMIT: i64 = 100;
const OFFERS_LIMIT: i64 = 100;
const BRAND_LIMIT: i64 = 1000;
const MIN_SEARCH_LEN: usize = 2;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Query parameters arrive as raw strings; malformed paging values fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ListQuery {
    pub paginated: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FilterQuery {
    pub brand: Option<String>,
    pub shape: Option<String>,
    pub balance: Option<String>,
    pub level: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub on_sale: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RacketOffers {
    id: i64,
    name: String,
    best: ResolvedPrice,
    offers: Vec<ResolvedPrice>,
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_u32(raw: Option<&str>) -> Option<u32> {
    non_blank(raw).and_then(|v| v.parse().ok())
}

/// Converts a 1-based `page` parameter to the zero-based page index.
fn zero_based_page(raw: Option<&str>) -> u32 {
    parse_u32(raw).unwrap_or(1).saturating_sub(1)
}

fn parse_price(raw: Option<&str>, param: &str) -> Result<Option<Decimal>, ApiError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(v) => v
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| ApiError::validation(format!("{param} must be a number"))),
    }
}

impl FilterQuery {
    fn filters(&self) -> Result<CatalogFilters, ApiError> {
        Ok(CatalogFilters {
            brand: non_blank(self.brand.as_deref()).map(String::from),
            shape: non_blank(self.shape.as_deref()).map(String::from),
            balance: non_blank(self.balance.as_deref()).map(String::from),
            game_level: non_blank(self.level.as_deref()).map(String::from),
            on_offer: non_blank(self.on_sale.as_deref()).map(|v| v == "true"),
            min_price: parse_price(self.min_price.as_deref(), "min_price")?,
            max_price: parse_price(self.max_price.as_deref(), "max_price")?,
        })
    }

    fn sort(&self) -> Result<SortOptions, ApiError> {
        let order = non_blank(self.sort_order.as_deref()).map(SortOrder::parse);
        match non_blank(self.sort_by.as_deref()) {
            None => Ok(SortOptions {
                order: order.unwrap_or(SortOptions::default().order),
                ..SortOptions::default()
            }),
            Some(raw) => {
                let field = SortField::parse(raw)
                    .ok_or_else(|| ApiError::validation(format!("cannot sort by '{raw}'")))?;
                Ok(SortOptions {
                    field,
                    order: order.unwrap_or_default(),
                })
            }
        }
    }
}

pub(super) async fn list_rackets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<NormalizedRacket>> {
    if non_blank(query.paginated.as_deref()) == Some("true") {
        let page = zero_based_page(query.page.as_deref());
        let limit = normalize_limit(parse_u32(query.limit.as_deref()), state.page_sizes);
        let total = padeldb_db::count_rackets(&state.pool)
            .await
            .map_err(|e| map_db_error(&req_id, &e))?;
        let pagination = Pagination::new(page, limit, u64::try_from(total).unwrap_or(0));
        let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);

        let rows = padeldb_db::list_rackets(&state.pool, Some(i64::from(limit)), offset)
            .await
            .map_err(|e| map_db_error(&req_id, &e))?;
        let data = state.normalizer.normalize(&rows);
        return Ok(Json(ApiResponse::ok(data).with_pagination(pagination)));
    }

    let rows = padeldb_db::list_rackets(&state.pool, None, 0)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;
    let data = state.normalizer.normalize(&rows);
    let message = format!("{} rackets loaded successfully", data.len());
    Ok(Json(ApiResponse::ok(data).with_message(message)))
}

pub(super) async fn search_rackets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<NormalizedRacket>> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(ApiError::validation(
            "Search must have at least 2 characters",
        ));
    }

    let rows = padeldb_db::search_rackets(&state.pool, term, SEARCH_LIMIT)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;
    let data = state.normalizer.normalize(&rows);
    let message = format!("{} results found for '{term}'", data.len());
    Ok(Json(ApiResponse::ok(data).with_message(message)))
}

pub(super) async fn filter_rackets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<NormalizedRacket>> {
    let filters = query.filters()?;
    let sort = query.sort()?;
    // Zero-based, unlike the plain listing.
    let page = parse_u32(query.page.as_deref()).unwrap_or(0);
    let limit = normalize_limit(parse_u32(query.limit.as_deref()), state.page_sizes);

    let rows = padeldb_db::list_rackets_filtered(&state.pool, &filters, sort)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;

    let mut rackets = filter_by_price(
        state.normalizer.normalize(&rows),
        filters.min_price,
        filters.max_price,
    );
    if sort.field == SortField::Price {
        sort_by_price(&mut rackets, sort.order);
    }

    let page = paginate(rackets, page, limit);
    Ok(Json(
        ApiResponse::ok(page.data).with_pagination(page.pagination),
    ))
}

pub(super) async fn list_on_offer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> ApiResult<Vec<NormalizedRacket>> {
    let rows = padeldb_db::list_rackets_on_offer(&state.pool, OFFERS_LIMIT)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;
    Ok(Json(ApiResponse::ok(state.normalizer.normalize(&rows))))
}

/// The catalog tracks no sales data, so there are never bestsellers.
pub(super) async fn list_bestsellers() -> ApiResult<Vec<NormalizedRacket>> {
    Ok(Json(ApiResponse::ok(Vec::new())))
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> ApiResult<Vec<String>> {
    let brands = padeldb_db::list_brands(&state.pool)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;
    Ok(Json(ApiResponse::ok(brands)))
}

pub(super) async fn list_by_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(brand): Path<String>,
) -> ApiResult<Vec<NormalizedRacket>> {
    let rows = padeldb_db::list_rackets_by_brand(&state.pool, brand.trim(), BRAND_LIMIT)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;
    Ok(Json(ApiResponse::ok(state.normalizer.normalize(&rows))))
}

pub(super) async fn stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> ApiResult<CatalogStats> {
    let stats = padeldb_db::racket_stats(&state.pool)
        .await
        .map_err(|e| map_db_error(&req_id, &e))?;
    Ok(Json(ApiResponse::ok(stats)))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::validation("ID must be a number"))?;
    if id <= 0 {
        return Err(ApiError::validation("ID must be a positive number"));
    }
    Ok(id)
}

async fn fetch_racket(
    state: &AppState,
    req_id: &RequestId,
    raw_id: &str,
) -> Result<padeldb_core::RawRacket, ApiError> {
    let id = parse_id(raw_id)?;
    padeldb_db::get_racket(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id, &e))?
        .ok_or_else(|| ApiError::not_found(format!("No racket found with ID {id}")))
}

pub(super) async fn get_racket(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> ApiResult<NormalizedRacket> {
    let racket = fetch_racket(&state, &req_id, &id).await?;
    Ok(Json(ApiResponse::ok(state.normalizer.normalize_one(&racket))))
}

pub(super) async fn get_racket_offers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> ApiResult<RacketOffers> {
    let racket = fetch_racket(&state, &req_id, &id).await?;
    let resolver = state.normalizer.resolver();
    Ok(Json(ApiResponse::ok(RacketOffers {
        id: racket.id,
        name: racket.name.clone(),
        best: resolver.resolve(&racket),
        offers: resolver.offers(&racket),
    })))
}
