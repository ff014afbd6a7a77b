//! Read queries over the `rackets` table.
//!
//! Rows are fetched as `to_jsonb(r)` and decoded into [`RawRacket`], so the
//! per-source price columns are picked up by whatever source table the
//! resolver is configured with rather than by a fixed column list here.

use padeldb_core::{CatalogFilters, CatalogStats, RawRacket, SortField, SortOptions, SortOrder};
use sqlx::{types::Json, PgPool};

use crate::DbError;

/// Returns a page of rackets, newest first.
///
/// `limit` is `None` to return every row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or a row cannot be decoded.
pub async fn list_rackets(
    pool: &PgPool,
    limit: Option<i64>,
    offset: i64,
) -> Result<Vec<RawRacket>, DbError> {
    let rows = sqlx::query_scalar::<_, Json<RawRacket>>(
        "SELECT to_jsonb(r) FROM rackets r \
         ORDER BY r.created_at DESC, r.id DESC \
         LIMIT COALESCE($1, 9223372036854775807) OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    tracing::debug!(count = rows.len(), offset, "loaded rackets");
    Ok(unwrap_rows(rows))
}

/// Total number of rackets in the catalog.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_rackets(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rackets")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Fetches one racket by primary key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_racket(pool: &PgPool, id: i64) -> Result<Option<RawRacket>, DbError> {
    let row = sqlx::query_scalar::<_, Json<RawRacket>>(
        "SELECT to_jsonb(r) FROM rackets r WHERE r.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|Json(racket)| racket))
}

/// Case-insensitive substring search over name, brand and model.
///
/// `%` and `_` in `query` match literally.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_rackets(
    pool: &PgPool,
    query: &str,
    limit: i64,
) -> Result<Vec<RawRacket>, DbError> {
    let pattern = format!("%{}%", escape_like(query));
    let rows = sqlx::query_scalar::<_, Json<RawRacket>>(
        "SELECT to_jsonb(r) FROM rackets r \
         WHERE r.name ILIKE $1 OR r.brand ILIKE $1 OR r.model ILIKE $1 \
         ORDER BY r.created_at DESC, r.id DESC \
         LIMIT $2",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(unwrap_rows(rows))
}

/// Rackets of one brand (exact match), newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_rackets_by_brand(
    pool: &PgPool,
    brand: &str,
    limit: i64,
) -> Result<Vec<RawRacket>, DbError> {
    let rows = sqlx::query_scalar::<_, Json<RawRacket>>(
        "SELECT to_jsonb(r) FROM rackets r \
         WHERE r.brand = $1 \
         ORDER BY r.created_at DESC, r.id DESC \
         LIMIT $2",
    )
    .bind(brand)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(unwrap_rows(rows))
}

/// Rackets flagged `on_offer`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_rackets_on_offer(pool: &PgPool, limit: i64) -> Result<Vec<RawRacket>, DbError> {
    let rows = sqlx::query_scalar::<_, Json<RawRacket>>(
        "SELECT to_jsonb(r) FROM rackets r \
         WHERE r.on_offer \
         ORDER BY r.created_at DESC, r.id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(unwrap_rows(rows))
}

/// Applies the column filters of [`CatalogFilters`] and the SQL-side part of
/// the ordering.
///
/// Price bounds and [`SortField::Price`] are not handled here: prices only
/// exist once each row has been resolved.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_rackets_filtered(
    pool: &PgPool,
    filters: &CatalogFilters,
    sort: SortOptions,
) -> Result<Vec<RawRacket>, DbError> {
    let sql = format!(
        "SELECT to_jsonb(r) FROM rackets r \
         WHERE ($1::TEXT IS NULL OR r.brand = $1) \
           AND ($2::TEXT IS NULL OR r.characteristics_shape = $2) \
           AND ($3::TEXT IS NULL OR r.characteristics_balance = $3) \
           AND ($4::TEXT IS NULL OR r.characteristics_game_level = $4) \
           AND ($5::BOOLEAN IS NULL OR r.on_offer = $5) \
         ORDER BY {}",
        order_clause(sort)
    );

    let rows = sqlx::query_scalar::<_, Json<RawRacket>>(&sql)
        .bind(filters.brand.as_deref())
        .bind(filters.shape.as_deref())
        .bind(filters.balance.as_deref())
        .bind(filters.game_level.as_deref())
        .bind(filters.on_offer)
        .fetch_all(pool)
        .await?;

    tracing::debug!(count = rows.len(), ?filters, "filtered rackets");
    Ok(unwrap_rows(rows))
}

/// Distinct non-empty brand names, sorted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let brands = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT brand FROM rackets \
         WHERE brand IS NOT NULL AND brand <> '' \
         ORDER BY brand",
    )
    .fetch_all(pool)
    .await?;
    Ok(brands)
}

/// Catalog counters for the stats endpoint.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn racket_stats(pool: &PgPool) -> Result<CatalogStats, DbError> {
    let (total, on_sale, brands) = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE on_offer), \
                COUNT(DISTINCT NULLIF(brand, '')) \
         FROM rackets",
    )
    .fetch_one(pool)
    .await?;

    Ok(CatalogStats {
        total,
        bestsellers: 0,
        on_sale,
        brands,
    })
}

fn unwrap_rows(rows: Vec<Json<RawRacket>>) -> Vec<RawRacket> {
    rows.into_iter().map(|Json(racket)| racket).collect()
}

/// Maps a whitelisted sort to an `ORDER BY` body. Never interpolates caller
/// input.
fn order_clause(sort: SortOptions) -> &'static str {
    match (sort.field, sort.order) {
        (SortField::Name, SortOrder::Asc) => "r.name ASC, r.id ASC",
        (SortField::Name, SortOrder::Desc) => "r.name DESC, r.id DESC",
        (SortField::Brand, SortOrder::Asc) => "r.brand ASC NULLS LAST, r.id ASC",
        (SortField::Brand, SortOrder::Desc) => "r.brand DESC NULLS LAST, r.id DESC",
        (SortField::CreatedAt, SortOrder::Asc) => "r.created_at ASC, r.id ASC",
        (SortField::CreatedAt | SortField::Price, _) => "r.created_at DESC, r.id DESC",
    }
}

/// Escapes `LIKE` metacharacters using Postgres' default `\` escape.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
