//! Retail source table.
//!
//! Each source contributes four columns to a racket row, named
//! `{source}_actual_price`, `{source}_original_price`,
//! `{source}_discount_percentage` and `{source}_link`. Adding a retailer means
//! adding a name here (or to `PADELDB_RETAIL_SOURCES`), not new code paths.

use rust_decimal::Decimal;

use crate::racket::{RawRacket, ResolvedPrice};

/// Retailers tracked out of the box, in declaration order.
pub const DEFAULT_SOURCE_NAMES: [&str; 3] = ["padelnuestro", "padelmarket", "padelproshop"];

/// One retailer whose price for a racket is tracked separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailSource {
    name: String,
    actual_price_key: String,
    original_price_key: String,
    discount_percentage_key: String,
    link_key: String,
}

impl RetailSource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            actual_price_key: format!("{name}_actual_price"),
            original_price_key: format!("{name}_original_price"),
            discount_percentage_key: format!("{name}_discount_percentage"),
            link_key: format!("{name}_link"),
            name,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn actual_price_key(&self) -> &str {
        &self.actual_price_key
    }

    /// Reads this source's four columns from a racket row.
    #[must_use]
    pub fn offer(&self, racket: &RawRacket) -> SourceOffer {
        SourceOffer {
            actual_price: racket.decimal_field(&self.actual_price_key),
            original_price: racket.decimal_field(&self.original_price_key),
            discount_percentage: racket.decimal_field(&self.discount_percentage_key),
            link: racket
                .string_field(&self.link_key)
                .map(ToOwned::to_owned),
        }
    }
}

/// Builds the default source table.
#[must_use]
pub fn default_sources() -> Vec<RetailSource> {
    DEFAULT_SOURCE_NAMES
        .iter()
        .copied()
        .map(RetailSource::new)
        .collect()
}

/// Pricing columns of one source for one racket, exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOffer {
    pub actual_price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub link: Option<String>,
}

impl SourceOffer {
    /// The current price, when it qualifies as a real offer.
    ///
    /// `0` is the out-of-stock sentinel and never counts.
    #[must_use]
    pub fn eligible_price(&self) -> Option<Decimal> {
        self.actual_price.filter(|p| *p > Decimal::ZERO)
    }

    /// Converts into the public price shape, attributing it to `source`.
    #[must_use]
    pub fn into_resolved(self, source: &str) -> ResolvedPrice {
        ResolvedPrice {
            precio_actual: self.actual_price.unwrap_or_default(),
            precio_original: self.original_price,
            descuento_porcentaje: self.discount_percentage.unwrap_or_default(),
            enlace: self.link.unwrap_or_default(),
            fuente: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_builds_column_names_from_its_name() {
        let source = RetailSource::new("padelpoint");
        assert_eq!(source.name(), "padelpoint");
        assert_eq!(source.actual_price_key(), "padelpoint_actual_price");
    }

    #[test]
    fn default_sources_keep_declaration_order() {
        let names: Vec<_> = default_sources()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["padelnuestro", "padelmarket", "padelproshop"]);
    }

    #[test]
    fn offer_reads_all_four_columns() {
        let racket = RawRacket::new(1, "Nox AT10")
            .with_field("padelnuestro_actual_price", 120)
            .with_field("padelnuestro_original_price", 150)
            .with_field("padelnuestro_discount_percentage", 20)
            .with_field("padelnuestro_link", "pn");

        let offer = RetailSource::new("padelnuestro").offer(&racket);
        assert_eq!(offer.actual_price, Some(Decimal::new(120, 0)));
        assert_eq!(offer.original_price, Some(Decimal::new(150, 0)));
        assert_eq!(offer.discount_percentage, Some(Decimal::new(20, 0)));
        assert_eq!(offer.link.as_deref(), Some("pn"));
    }

    #[test]
    fn zero_and_negative_prices_are_not_eligible() {
        let zero = SourceOffer {
            actual_price: Some(Decimal::ZERO),
            ..SourceOffer::default()
        };
        let negative = SourceOffer {
            actual_price: Some(Decimal::new(-5, 0)),
            ..SourceOffer::default()
        };
        assert!(zero.eligible_price().is_none());
        assert!(negative.eligible_price().is_none());
        assert!(SourceOffer::default().eligible_price().is_none());
    }

    #[test]
    fn into_resolved_fills_missing_fields_with_defaults() {
        let offer = SourceOffer {
            actual_price: Some(Decimal::new(99, 0)),
            ..SourceOffer::default()
        };
        let resolved = offer.into_resolved("padelmarket");
        assert_eq!(resolved.precio_actual, Decimal::new(99, 0));
        assert!(resolved.precio_original.is_none());
        assert_eq!(resolved.descuento_porcentaje, Decimal::ZERO);
        assert_eq!(resolved.enlace, "");
        assert_eq!(resolved.fuente, "padelmarket");
    }
}
