use serde::{Deserialize, Deserializer, Serialize};

/// One trading day of chart data for a single symbol.
///
/// Field names follow the upstream JSON exactly. Upstream omits some fields
/// (notably `vwap` and `changeOverTime`) on sparse days and occasionally sends
/// `null`; both decode to the zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub open: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub high: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub low: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub close: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub volume: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub unadjusted_volume: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub change: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub change_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub vwap: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub change_over_time: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
