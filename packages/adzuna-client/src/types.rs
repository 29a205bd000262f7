use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters for `GET /{country}/search/{page}`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams<'a> {
    pub app_id: &'a str,
    pub app_key: &'a str,
    pub results_per_page: u32,
    pub what: &'a str,
    pub sort_by: &'a str,
}

/// One page of search results.
///
/// Postings are kept as raw JSON because Adzuna omits fields freely;
/// read them through [`RawJob::field`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<RawJob>>,
    pub count: Option<i64>,
    pub mean: Option<f64>,
}

impl SearchResponse {
    pub fn new(results: Vec<RawJob>) -> Self {
        let count = Some(results.len() as i64);
        Self {
            results: Some(results),
            count,
            mean: None,
        }
    }

    /// Postings on this page, newest first when requested with `sort_by=date`.
    /// A null or missing `results` key reads as an empty page.
    pub fn results(&self) -> &[RawJob] {
        self.results.as_deref().unwrap_or_default()
    }

    pub fn into_results(self) -> Vec<RawJob> {
        self.results.unwrap_or_default()
    }
}

/// A single posting exactly as Adzuna returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawJob(Value);

impl RawJob {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Top-level field lookup. Chain [`Field::get`] for nested objects.
    pub fn field(&self, key: &str) -> Field<'_> {
        Field::root(&self.0).get(key)
    }

    /// Raw `created` timestamp string, if present.
    pub fn created(&self) -> Option<&str> {
        self.field("created").as_str()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawJob {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Optional-field view into a JSON document.
///
/// Every lookup on a missing key, a null, or a non-object parent yields
/// an absent `Field` rather than failing, so chains like
/// `job.field("company").get("display_name").text()` never panic.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a>(Option<&'a Value>);

impl<'a> Field<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self(Some(value))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn get(self, key: &str) -> Field<'a> {
        Field(self.0.and_then(Value::as_object).and_then(|map| map.get(key)))
    }

    pub fn is_absent(self) -> bool {
        matches!(self.0, None | Some(Value::Null))
    }

    pub fn as_str(self) -> Option<&'a str> {
        self.0.and_then(Value::as_str)
    }

    /// Scalar rendered as text. Numbers and booleans are stringified,
    /// objects and arrays are treated as absent.
    pub fn text(self) -> Option<String> {
        match self.0? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric value, accepting JSON numbers and numeric strings.
    pub fn number(self) -> Option<f64> {
        match self.0? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
