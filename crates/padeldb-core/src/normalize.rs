//! Folds raw catalog rows into [`NormalizedRacket`]s.

use std::sync::Arc;

use crate::clock::{iso_timestamp, Clock, SystemClock};
use crate::racket::{NormalizedRacket, RawRacket, NORMALIZED_KEYS};
use crate::resolve::PriceResolver;

/// Runs the [`PriceResolver`] over catalog rows and merges each result with
/// the row's identity fields.
///
/// Stateless apart from the immutable source table and clock, so a single
/// instance is shared by every request handler.
#[derive(Clone)]
pub struct CatalogNormalizer {
    resolver: PriceResolver,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CatalogNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogNormalizer")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Default for CatalogNormalizer {
    fn default() -> Self {
        Self::new(PriceResolver::default())
    }
}

impl CatalogNormalizer {
    #[must_use]
    pub fn new(resolver: PriceResolver) -> Self {
        Self::with_clock(resolver, SystemClock)
    }

    #[must_use]
    pub fn with_clock(resolver: PriceResolver, clock: impl Clock + 'static) -> Self {
        Self {
            resolver,
            clock: Arc::new(clock),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &PriceResolver {
        &self.resolver
    }

    /// Normalizes a batch; output has the same length and order as `raw`.
    #[must_use]
    pub fn normalize(&self, raw: &[RawRacket]) -> Vec<NormalizedRacket> {
        raw.iter().map(|r| self.normalize_one(r)).collect()
    }

    #[must_use]
    pub fn normalize_one(&self, raw: &RawRacket) -> NormalizedRacket {
        let scrapeado_en = match raw.scraped_at.as_deref() {
            Some(ts) if !ts.is_empty() => ts.to_string(),
            _ => iso_timestamp(self.clock.now()),
        };

        let mut extra = raw.fields.clone();
        for key in NORMALIZED_KEYS {
            extra.remove(key);
        }

        NormalizedRacket {
            id: raw.id,
            name: raw.name.clone(),
            brand: raw.brand.clone(),
            model: raw.model.clone(),
            image: raw.image.clone(),
            description: raw.description.clone(),
            on_offer: raw.on_offer,
            price: self.resolver.resolve(raw),
            scrapeado_en,
            extra,
        }
    }
}
