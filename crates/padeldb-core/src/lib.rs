pub mod app_config;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod normalize;
pub mod racket;
pub mod resolve;
pub mod sources;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    filter_by_price, paginate, sort_by_price, CatalogFilters, CatalogStats, Page, Pagination,
    SortField, SortOptions, SortOrder,
};
pub use clock::{iso_timestamp, Clock, FixedClock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env, parse_retail_sources};
pub use normalize::CatalogNormalizer;
pub use racket::{NormalizedRacket, RawRacket, ResolvedPrice, NORMALIZED_KEYS, NO_PRICE_AVAILABLE};
pub use resolve::PriceResolver;
pub use sources::{default_sources, RetailSource, SourceOffer, DEFAULT_SOURCE_NAMES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
