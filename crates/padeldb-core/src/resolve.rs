//! Best-offer selection across retail sources.

use rust_decimal::Decimal;

use crate::racket::{RawRacket, ResolvedPrice};
use crate::sources::{default_sources, RetailSource, SourceOffer};

/// Picks the cheapest eligible offer for a racket.
///
/// Only sources whose current price is strictly positive take part. The
/// lowest current price wins; on an exact tie the source declared first
/// wins. Resolution never fails: a racket with no eligible source gets
/// [`ResolvedPrice::unavailable`].
#[derive(Debug, Clone)]
pub struct PriceResolver {
    sources: Vec<RetailSource>,
}

impl Default for PriceResolver {
    fn default() -> Self {
        Self::new(default_sources())
    }
}

impl PriceResolver {
    #[must_use]
    pub fn new(sources: Vec<RetailSource>) -> Self {
        Self { sources }
    }

    #[must_use]
    pub fn sources(&self) -> &[RetailSource] {
        &self.sources
    }

    #[must_use]
    pub fn resolve(&self, racket: &RawRacket) -> ResolvedPrice {
        let mut best: Option<(&RetailSource, SourceOffer, Decimal)> = None;

        for (source, offer, price) in self.eligible_offers(racket) {
            let cheaper = match &best {
                Some((_, _, best_price)) => price < *best_price,
                None => true,
            };
            if cheaper {
                best = Some((source, offer, price));
            }
        }

        match best {
            Some((source, offer, _)) => offer.into_resolved(source.name()),
            None => ResolvedPrice::unavailable(),
        }
    }

    /// Every eligible offer for a racket, cheapest first.
    ///
    /// Equal prices keep declaration order. Used by the store comparison
    /// view; the first entry, when present, equals [`Self::resolve`].
    #[must_use]
    pub fn offers(&self, racket: &RawRacket) -> Vec<ResolvedPrice> {
        let mut offers: Vec<_> = self.eligible_offers(racket).collect();
        offers.sort_by_key(|(_, _, price)| *price);
        offers
            .into_iter()
            .map(|(source, offer, _)| offer.into_resolved(source.name()))
            .collect()
    }

    fn eligible_offers<'a>(
        &'a self,
        racket: &'a RawRacket,
    ) -> impl Iterator<Item = (&'a RetailSource, SourceOffer, Decimal)> + 'a {
        self.sources.iter().filter_map(move |source| {
            let offer = source.offer(racket);
            offer.eligible_price().map(|price| (source, offer, price))
        })
    }
}
