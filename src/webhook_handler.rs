use crate::errors::AppError;
use crate::handlers::AppState;
use crate::store::PropertyStore;
use crate::webhook_models::{IngestSummary, PropertyRow, WebhookAck, WebhookPayload};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// CORS headers attached to every webhook response, preflight included.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "POST, OPTIONS"),
    (
        "access-control-allow-headers",
        "authorization, x-client-info, apikey, content-type",
    ),
];

/// Property Listing Webhook Handler
///
/// Receives listings pushed by third-party feeds, normalizes the payload
/// shape, and appends one row per usable listing. Per-row rejections and
/// store failures are logged and skipped; the caller only learns whether
/// the request as a whole was readable.
///
/// Expected payload: an object wrapping a `properties` array, a single
/// listing object, or a bare array of listings.
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Received property webhook");

    // 1. Parse the body according to the declared content type
    let payload = parse_body(&headers, &body)?;
    tracing::debug!("Webhook payload: {}", payload);

    // 2. Normalize into a flat sequence of candidate records
    let records = WebhookPayload::classify(payload).into_records();
    tracing::info!("Processing {} candidate record(s)", records.len());

    // 3. Insert accepted records one at a time
    let summary = ingest_records(
        state.store.as_ref(),
        &state.config.properties_table,
        records,
    )
    .await;

    tracing::info!(
        "Webhook processing complete: {} received, {} stored, {} rejected, {} failed",
        summary.received,
        summary.stored,
        summary.rejected,
        summary.failed
    );

    // 4. Acknowledge the delivery; per-row outcomes stay in the logs
    Ok((
        StatusCode::OK,
        CORS_HEADERS,
        Json(WebhookAck {
            success: true,
            message: "Webhook received successfully".to_string(),
        }),
    ))
}

/// CORS preflight for the webhook endpoint.
///
/// Answered before any body handling with an empty 204.
pub async fn preflight() -> impl IntoResponse {
    tracing::debug!("Handling CORS preflight request");
    (StatusCode::NO_CONTENT, CORS_HEADERS)
}

/// Select a parse strategy from the `content-type` header: JSON,
/// form-urlencoded, or raw text wrapped with the observed content type
/// for diagnostics.
pub fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        serde_json::from_slice(body)
            .map_err(|e| AppError::Payload(format!("invalid JSON payload: {}", e)))
    } else if content_type.contains("application/x-www-form-urlencoded") {
        let mut fields = Map::new();
        for (key, value) in url::form_urlencoded::parse(body) {
            fields.insert(key.into_owned(), Value::String(value.into_owned()));
        }
        Ok(Value::Object(fields))
    } else {
        Ok(json!({
            "raw_body": String::from_utf8_lossy(body),
            "content_type": content_type,
        }))
    }
}

/// Sequential insert loop over candidate records.
///
/// A record is skipped when it lacks both title and address; a store
/// error fails that record only and the loop continues. No row outcome
/// aborts the batch.
pub async fn ingest_records(
    store: &dyn PropertyStore,
    table: &str,
    records: Vec<Value>,
) -> IngestSummary {
    let mut summary = IngestSummary {
        received: records.len(),
        ..IngestSummary::default()
    };

    for record in records {
        let Some(row) = PropertyRow::from_record(&record) else {
            tracing::info!("Skipping property without title or address: {}", record);
            summary.rejected += 1;
            continue;
        };

        match store.insert(table, &row).await {
            Ok(()) => {
                tracing::info!("Property stored successfully: {}", row.title);
                summary.stored += 1;
            }
            Err(e) => {
                tracing::error!("Error storing property: {}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}
