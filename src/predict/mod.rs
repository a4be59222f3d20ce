pub mod buckets;
pub mod types;

pub use buckets::UNKNOWN;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::features::{self, PullRequestRecord};
use crate::github::GitHubError;
use types::{PredictionRequest, PredictionResponse, TabularData};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Prediction request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to serialize features: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TtmError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// One-row table whose columns are the record's fields, in field order.
/// Nested maps and lists stay whole inside their cell.
pub fn to_tabular(record: &PullRequestRecord) -> Result<PredictionRequest, serde_json::Error> {
    let fields: Map<String, Value> = serde_json::from_value(serde_json::to_value(record)?)?;
    let (names, row): (Vec<String>, Vec<Value>) = fields.into_iter().unzip();
    Ok(PredictionRequest {
        data: TabularData {
            names,
            ndarray: vec![row],
        },
    })
}

/// Index of the highest score; the first one wins a tie.
pub fn best_class(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Duration bucket for a successful response, if every lookup succeeds.
pub fn select_bucket(response: &PredictionResponse) -> Option<&'static str> {
    let names = response.data.names.as_ref().filter(|n| !n.is_empty())?;
    let index = best_class(response.data.scores())?;
    let class_name = names.get(index)?;
    debug!(%class_name, index, "selected class");
    buckets::bucket_label(class_name)
}

/// Map a prediction service reply to a bucket label, never failing.
pub fn interpret_response(status: StatusCode, body: &str) -> String {
    if !status.is_success() {
        error!(status = status.as_u16(), "prediction service returned an error status");
        return UNKNOWN.to_string();
    }

    let response: PredictionResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "unexpected prediction response body");
            return UNKNOWN.to_string();
        }
    };

    select_bucket(&response).unwrap_or(UNKNOWN).to_string()
}

/// POST the record to the model endpoint and return its duration bucket.
/// Only transport failures are errors; a bad status or body yields `Unknown`.
#[instrument(skip(http, record), fields(title = %record.title))]
pub async fn predict(
    http: &reqwest::Client,
    endpoint_url: &str,
    record: &PullRequestRecord,
) -> Result<String, PredictError> {
    let payload = to_tabular(record)?;
    debug!(columns = payload.data.names.len(), "sending features");

    let response = http
        .post(endpoint_url)
        .header(CONTENT_TYPE, "application/json")
        .body(serde_json::to_vec(&payload)?)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Ok(interpret_response(status, ""));
    }
    let body = response.text().await?;
    let bucket = interpret_response(status, &body);
    info!(status = status.as_u16(), %bucket, "prediction received");
    Ok(bucket)
}

/// Full pipeline: extract features for the pull request, then predict its time to merge.
pub async fn get_ttm(
    model_url: &str,
    repo_id: &str,
    pr_id: u64,
    token: &str,
) -> Result<String, TtmError> {
    let record = features::get_mi_parsed_pr(repo_id, pr_id, token).await?;
    let http = reqwest::Client::new();
    Ok(predict(&http, model_url, &record).await?)
}
