pub mod actors;
pub mod movies;
pub mod validate;

use serde::{Deserialize, Deserializer};

/// Partial-update field: absent stays `None` (with `#[serde(default)]`),
/// while an explicit `null` fails to deserialize because every column is NOT NULL.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
