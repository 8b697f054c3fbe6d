//! CSV row layout

use serde::Deserialize;
use serde_json::{Number, Value};

/// Expected header row, in template order
pub const CSV_COLUMNS: [&str; 16] = [
    "name1",
    "name2",
    "BIGSMILES",
    "N1",
    "v1(nm3)",
    "Rg1(nm)",
    "N2",
    "v2(nm3)",
    "Rg2(nm)",
    "Lapprox",
    "nchains",
    "Vbox(nm3)",
    "T(K)",
    "chi(vref=0.1nm3)",
    "chistd",
    "directory",
];

/// One diblock simulation record
///
/// Cells are kept as raw text; [`cell`] decides how each one lands in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolymerRow {
    pub name1: String,
    pub name2: String,
    #[serde(rename = "BIGSMILES")]
    pub bigsmiles: String,

    #[serde(rename = "N1")]
    pub n1: String,
    #[serde(rename = "v1(nm3)")]
    pub v1: String,
    #[serde(rename = "Rg1(nm)")]
    pub rg1: String,

    /// Read but not used for notes; component 2 takes its N from `N1`
    #[serde(rename = "N2", default)]
    pub n2: Option<String>,
    #[serde(rename = "v2(nm3)")]
    pub v2: String,
    #[serde(rename = "Rg2(nm)")]
    pub rg2: String,

    #[serde(rename = "Lapprox")]
    pub lapprox: String,
    pub nchains: String,
    #[serde(rename = "Vbox(nm3)")]
    pub vbox: String,
    #[serde(rename = "T(K)")]
    pub temperature: String,
    #[serde(rename = "chi(vref=0.1nm3)")]
    pub chi: String,
    pub chistd: String,
    pub directory: String,
}

/// JSON value for a raw CSV cell
///
/// Integers and finite floats become numbers, blank cells become null,
/// anything else is passed through as a string.
pub fn cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}
