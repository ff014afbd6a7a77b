//! Command handlers for the CLI.
//!
//! Handlers read a JSON dump, run it through the catalog normalizer and
//! return the rendered JSON; `main` owns printing.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use padeldb_core::{
    default_sources, parse_retail_sources, CatalogNormalizer, FixedClock, PriceResolver,
    RawRacket, ResolvedPrice,
};
use serde::Serialize;

pub(crate) struct RunOptions {
    pub path: PathBuf,
    pub normalizer: CatalogNormalizer,
    pub pretty: bool,
}

impl RunOptions {
    /// Builds the normalizer from the optional source list and fixed clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the source list is invalid or `now` is not an
    /// RFC 3339 timestamp.
    pub(crate) fn new(
        path: PathBuf,
        sources: Option<&str>,
        now: Option<&str>,
        pretty: bool,
    ) -> anyhow::Result<Self> {
        let sources = match sources {
            Some(raw) => parse_retail_sources("--sources", raw)?,
            None => default_sources(),
        };
        let resolver = PriceResolver::new(sources);

        let normalizer = match now {
            Some(raw) => {
                let at = DateTime::parse_from_rfc3339(raw)
                    .with_context(|| format!("--now is not an RFC 3339 timestamp: {raw}"))?
                    .with_timezone(&Utc);
                CatalogNormalizer::with_clock(resolver, FixedClock(at))
            }
            None => CatalogNormalizer::new(resolver),
        };

        Ok(Self {
            path,
            normalizer,
            pretty,
        })
    }
}

/// One line of `best-price` output.
#[derive(Debug, Serialize)]
pub(crate) struct BestPriceRow {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub price: ResolvedPrice,
}

pub(crate) fn run_normalize(options: &RunOptions) -> anyhow::Result<String> {
    let rackets = read_rackets(&options.path)?;
    let normalized = options.normalizer.normalize(&rackets);
    tracing::info!(count = normalized.len(), "normalized rackets");
    render(&normalized, options.pretty)
}

pub(crate) fn run_best_price(options: &RunOptions) -> anyhow::Result<String> {
    let rackets = read_rackets(&options.path)?;
    let rows = best_prices(options.normalizer.resolver(), rackets);
    let priced = rows.iter().filter(|r| r.price.is_available()).count();
    tracing::info!(count = rows.len(), priced, "resolved best prices");
    render(&rows, options.pretty)
}

pub(crate) fn best_prices(resolver: &PriceResolver, rackets: Vec<RawRacket>) -> Vec<BestPriceRow> {
    rackets
        .into_iter()
        .map(|racket| BestPriceRow {
            price: resolver.resolve(&racket),
            id: racket.id,
            name: racket.name,
        })
        .collect()
}

/// Parses a JSON array of raw rackets.
///
/// # Errors
///
/// Returns an error if the input is not a JSON array of objects with at least
/// an `id`.
pub(crate) fn parse_rackets(input: &str) -> anyhow::Result<Vec<RawRacket>> {
    serde_json::from_str(input).context("input must be a JSON array of rackets")
}

fn read_rackets(path: &Path) -> anyhow::Result<Vec<RawRacket>> {
    let input = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_rackets(&input)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}
