//! Catalog record shapes: the raw row as stored and the normalized record
//! served to every listing, search and comparison view.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `fuente` value used when no retail source has a usable offer.
pub const NO_PRICE_AVAILABLE: &str = "No price available";

/// A racket row as read from storage.
///
/// Identity and display columns are typed; every other column (including the
/// per-source `{source}_actual_price` / `_original_price` /
/// `_discount_percentage` / `_link` quadruples) lands in [`RawRacket::fields`]
/// so the configured source table, not this struct, decides which columns are
/// read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRacket {
    /// `0` when the stored id is missing or not an integer.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub on_offer: bool,
    /// ISO-8601 scrape timestamp, when the ingestion job recorded one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub scraped_at: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRacket {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets an untyped column, returning `self` for chaining.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns an untyped column; `null` and absent are both `None`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Reads a numeric column as a [`Decimal`].
    ///
    /// Anything other than a JSON number (strings, booleans, objects) reads
    /// as `None`.
    #[must_use]
    pub fn decimal_field(&self, key: &str) -> Option<Decimal> {
        match self.field(key)? {
            Value::Number(n) => {
                let raw = n.to_string();
                raw.parse::<Decimal>()
                    .ok()
                    .or_else(|| Decimal::from_scientific(&raw).ok())
            }
            _ => None,
        }
    }

    /// Reads a string column.
    #[must_use]
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

/// The single best offer picked for a racket across all retail sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    #[serde(with = "rust_decimal::serde::float")]
    pub precio_actual: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub precio_original: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub descuento_porcentaje: Decimal,
    pub enlace: String,
    pub fuente: String,
}

impl ResolvedPrice {
    /// The result used when no source has an eligible offer.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            precio_actual: Decimal::ZERO,
            precio_original: None,
            descuento_porcentaje: Decimal::ZERO,
            enlace: String::new(),
            fuente: NO_PRICE_AVAILABLE.to_string(),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.fuente != NO_PRICE_AVAILABLE
    }
}

impl Default for ResolvedPrice {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// Keys written by [`NormalizedRacket`] itself. Raw columns with these names
/// are not passed through.
pub const NORMALIZED_KEYS: [&str; 13] = [
    "id",
    "name",
    "brand",
    "model",
    "image",
    "description",
    "on_offer",
    "precio_actual",
    "precio_original",
    "descuento_porcentaje",
    "enlace",
    "fuente",
    "scrapeado_en",
];

/// Display-ready racket: identity fields, the resolved best offer and every
/// other stored column (characteristics, specs, per-source prices,
/// timestamps) passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRacket {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub on_offer: bool,
    #[serde(flatten)]
    pub price: ResolvedPrice,
    pub scrapeado_en: String,
    /// Remaining raw columns, minus any key in [`NORMALIZED_KEYS`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or_default())
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Ok(b),
        _ => Ok(false),
    }
}
