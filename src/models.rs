use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub actual_cpa: String,
    pub target_cpa: f64,
}

/// Raw values posted by the HTML form. Everything arrives as text so bad
/// input can be reported inline instead of rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub actual_cpa: String,
    #[serde(default)]
    pub target_cpa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpaRow {
    pub date: NaiveDate,
    pub actual_cpa: f64,
    pub target_cpa: f64,
    pub rolling_mean: f64,
    pub rolling_std: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub adjusted_end_date: NaiveDate,
    pub target_cpa: f64,
    pub rolling_window: usize,
    pub rows: Vec<CpaRow>,
}

/// Initial values shown in the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefaults {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub actual_cpa: String,
    pub target_cpa: f64,
}

impl From<FormDefaults> for AnalyzeForm {
    fn from(defaults: FormDefaults) -> Self {
        Self {
            start_date: defaults.start_date.to_string(),
            end_date: defaults.end_date.to_string(),
            actual_cpa: defaults.actual_cpa,
            target_cpa: defaults.target_cpa.to_string(),
        }
    }
}
