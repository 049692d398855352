//! HTTP request handlers
//!
//! Core calls do blocking file I/O and matrix work, so each one runs on
//! tokio's blocking pool.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Multipart, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::error::HousePriceError;
use crate::inference::{predict_with_store, PredictRequest, PredictResponse};
use crate::training::{EvalReport, TrainReport};
use crate::utils::DataLoader;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Multipart field carrying the uploaded CSV
const UPLOAD_FIELD: &str = "file";

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the House Price Prediction API",
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    csv_path: Option<String>,
}

impl DatasetQuery {
    fn resolve(self, state: &AppState) -> PathBuf {
        self.csv_path
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| state.dataset_path())
    }
}

/// Fit on the given (or uploaded) dataset and replace the stored model
pub async fn train(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<TrainReport>> {
    let csv_path = query.resolve(&state);
    info!(path = %csv_path.display(), "Training requested");

    let report = tokio::task::spawn_blocking(move || {
        state.trainer.train_and_save(&csv_path, &state.store)
    })
    .await??;

    Ok(Json(report))
}

/// Score the stored model over the full dataset
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<EvalReport>> {
    let csv_path = query.resolve(&state);

    let report = tokio::task::spawn_blocking(move || {
        state.trainer.evaluate_saved(&csv_path, &state.store)
    })
    .await??;

    Ok(Json(report))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let predictions =
        tokio::task::spawn_blocking(move || predict_with_store(&state.store, &request)).await??;

    Ok(Json(PredictResponse { predictions }))
}

/// Replace the canonical dataset with an uploaded CSV
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("data.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        info!(file = %file_name, bytes = data.len(), "Received dataset upload");

        let target = state.dataset_path();
        let saved = target.clone();
        tokio::task::spawn_blocking(move || save_dataset(&data, &target)).await??;

        return Ok(Json(serde_json::json!({
            "detail": format!("Saved dataset to {}", saved.display()),
        })));
    }

    Err(ServerError::BadRequest(format!(
        "Missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}

/// Check the bytes parse as CSV, then swap them into place atomically
fn save_dataset(data: &[u8], target: &std::path::Path) -> Result<()> {
    if data.is_empty() {
        return Err(ServerError::BadRequest("Uploaded file is empty".to_string()));
    }
    DataLoader::new().parse_csv_bytes(data).map_err(|e| {
        HousePriceError::ValidationError(format!("Uploaded file is not a readable CSV: {}", e))
    })?;

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| ServerError::Io(e.error))?;

    info!(path = %target.display(), bytes = data.len(), "Saved dataset");
    Ok(())
}

pub async fn serve_ui() -> Html<&'static str> {
    Html(EMBEDDED_UI_HTML)
}

const EMBEDDED_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>House Price Prediction</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 32rem; margin: 2rem auto; padding: 0 1rem; color: #1f2937; }
        label { display: block; margin-top: 0.75rem; font-size: 0.9rem; }
        input { width: 100%; padding: 0.4rem; box-sizing: border-box; }
        button { margin-top: 1.25rem; padding: 0.5rem 1rem; }
        #result { margin-top: 1.25rem; font-weight: 600; }
        .error { color: #b91c1c; }
    </style>
</head>
<body>
    <h1>House Price Prediction</h1>
    <p>Enter details below to get a predicted house price.</p>
    <form id="predict-form">
        <label>Bedrooms <input name="bedrooms" type="number" min="0" value="3"></label>
        <label>Bathrooms <input name="bathrooms" type="number" min="0" step="0.25" value="2.0"></label>
        <label>Living Area (sqft) <input name="sqft_living" type="number" min="100" value="1500"></label>
        <label>Lot Area (sqft) <input name="sqft_lot" type="number" min="500" value="5000"></label>
        <label>Floors <input name="floors" type="number" min="1" step="0.5" value="1.0"></label>
        <label>Condition (1-5) <input name="condition" type="number" min="1" max="5" value="3"></label>
        <label>Year Built <input name="yr_built" type="number" min="1800" value="1990"></label>
        <button type="submit">Predict Price</button>
    </form>
    <div id="result"></div>
    <script>
        document.getElementById('predict-form').addEventListener('submit', async (event) => {
            event.preventDefault();
            const record = {};
            for (const [key, value] of new FormData(event.target)) {
                record[key] = Number(value);
            }
            const result = document.getElementById('result');
            result.className = '';
            try {
                const response = await fetch('/predict', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ record }),
                });
                const body = await response.json();
                if (!response.ok) {
                    throw new Error(body.message || response.statusText);
                }
                const price = body.predictions[0].toLocaleString('en-US', { minimumFractionDigits: 2, maximumFractionDigits: 2 });
                result.textContent = `Estimated Price: $${price}`;
            } catch (err) {
                result.className = 'error';
                result.textContent = `Error: ${err.message}`;
            }
        });
    </script>
</body>
</html>
"#;
