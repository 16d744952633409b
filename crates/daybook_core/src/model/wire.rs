//! Serde adapters for loosely typed JSON coming from views and SQL rows.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl LooseFlag {
    fn truthy(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
            Self::Text(value) => matches!(value.trim(), "1" | "true" | "TRUE" | "True"),
        }
    }
}

/// `completed` may arrive as `true`, `1` or `"1"`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseFlag>::deserialize(deserializer)?.is_some_and(LooseFlag::truthy))
}

pub(crate) fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LooseFlag>::deserialize(deserializer)?.map(LooseFlag::truthy))
}

/// Treats `""` like `null`.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.trim().is_empty()))
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
