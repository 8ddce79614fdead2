//! Deserialization helpers shared by the backend models.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Reads an optional decimal, mapping `null` to zero.
///
/// Combined with `#[serde(default)]` this makes absent and `null` numeric
/// fields both read as zero.
pub(crate) fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads an optional count, mapping `null` to zero.
pub(crate) fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
