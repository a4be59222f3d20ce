use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{"data": {"names": [...], "ndarray": [[...]]}}` request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    pub data: TabularData,
}

/// Single-table payload: column names plus rows of cell values.
#[derive(Debug, Clone, Serialize)]
pub struct TabularData {
    pub names: Vec<String>,
    pub ndarray: Vec<Vec<Value>>,
}

/// Prediction service reply. Both fields may be missing.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub data: ResponseData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub names: Option<Vec<String>>,
    #[serde(default)]
    pub ndarray: Option<Vec<Vec<f64>>>,
}

impl ResponseData {
    /// Scores of the first row, empty if there is none.
    pub fn scores(&self) -> &[f64] {
        self.ndarray
            .as_ref()
            .and_then(|rows| rows.first())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
