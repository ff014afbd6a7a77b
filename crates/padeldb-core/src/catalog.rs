//! Filtering, ordering and paging over normalized rackets.
//!
//! Column filters are evaluated by the storage layer; price bounds and price
//! ordering only exist after resolution, so they run here on
//! [`NormalizedRacket::price`].

use rust_decimal::Decimal;
use serde::Serialize;

use crate::racket::NormalizedRacket;

/// Catalog search filters accepted by the filter endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    pub brand: Option<String>,
    pub shape: Option<String>,
    pub balance: Option<String>,
    pub game_level: Option<String>,
    pub on_offer: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    Brand,
    Price,
}

impl SortField {
    /// Parses a `sortBy` value; unknown fields are rejected so they can never
    /// reach an `ORDER BY` clause.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created_at" => Some(Self::CreatedAt),
            "name" => Some(Self::Name),
            "brand" => Some(Self::Brand),
            "price" | "precio_actual" => Some(Self::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `desc` sorts ascending.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortOptions {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Keeps rackets whose resolved price lies within `[min, max]`.
///
/// A racket with no offer carries a price of `0`, so any positive minimum
/// drops it.
#[must_use]
pub fn filter_by_price(
    rackets: Vec<NormalizedRacket>,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Vec<NormalizedRacket> {
    if min.is_none() && max.is_none() {
        return rackets;
    }

    rackets
        .into_iter()
        .filter(|r| {
            let price = r.price.precio_actual;
            min.is_none_or(|m| price >= m) && max.is_none_or(|m| price <= m)
        })
        .collect()
}

/// Stable in-memory sort on the resolved price.
pub fn sort_by_price(rackets: &mut [NormalizedRacket], order: SortOrder) {
    match order {
        SortOrder::Asc => rackets.sort_by(|a, b| a.price.precio_actual.cmp(&b.price.precio_actual)),
        SortOrder::Desc => {
            rackets.sort_by(|a, b| b.price.precio_actual.cmp(&a.price.precio_actual));
        }
    }
}

/// Page metadata returned alongside paged listings. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    #[must_use]
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: u64::from(page) + 1 < total_pages,
            has_prev: page > 0,
        }
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Slices one page out of a fully materialized result set.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let total = items.len() as u64;
    let pagination = Pagination::new(page, limit, total);
    let skip = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);

    Page {
        data: items.into_iter().skip(skip).take(take).collect(),
        pagination,
    }
}

/// Headline catalog counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: i64,
    /// No bestseller column exists in the catalog; always zero.
    pub bestsellers: i64,
    pub on_sale: i64,
    pub brands: i64,
}
