pub mod inquiry;
pub mod portfolio;
pub mod template;

pub use inquiry::*;
pub use portfolio::*;
pub use template::*;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Admin forms post list fields either as JSON arrays or comma-separated
/// text; accept both.
pub(crate) fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        Text(String),
        List(Vec<String>),
    }

    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::Text(text) => Ok(split_csv(&text)),
        StringOrVec::List(list) => Ok(list),
    }
}

pub(crate) fn opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        Text(String),
        List(Vec<String>),
    }

    Ok(Option::<StringOrVec>::deserialize(deserializer)?.map(|value| match value {
        StringOrVec::Text(text) => split_csv(&text),
        StringOrVec::List(list) => list,
    }))
}

fn split_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Prices arrive as JSON numbers from the API and as strings from forms.
pub(crate) fn decimal_flex<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(Decimal),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse::<Decimal>()
            .map_err(serde::de::Error::custom),
    }
}

pub(crate) fn opt_decimal_flex<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(Decimal),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) => text
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
