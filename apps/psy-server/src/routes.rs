//! Request routing.
//!
//! Every response carries `Access-Control-Allow-Origin: *`. Engine work runs
//! on the blocking pool.

use std::convert::Infallible;
use std::sync::Arc;

use hyper::body::HttpBody;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use psy_engine::{PsychroInput, PsychroService};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{
    ChartBody, ChartResponse, HealthResponse, IndexResponse, MixingBody, MixingResponse,
    MultiPointBody, MultiPointResponse, PointEntry, ReferenceBody, ReferenceResponse,
    StateResponse,
};
use crate::error::ApiError;

/// Largest accepted request body [bytes].
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Shared per-process state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: PsychroService,
}

impl AppState {
    pub fn new(service: PsychroService) -> Arc<Self> {
        Arc::new(Self { service })
    }
}

/// Top-level service function.
pub async fn handle(state: Arc<AppState>, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = if method == Method::OPTIONS {
        preflight()
    } else {
        match route(state, req).await {
            Ok(response) => response,
            Err(err) => {
                debug!(%method, %path, error = %err, "request failed");
                err.into_response()
            }
        }
    };

    response
        .headers_mut()
        .insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    debug!(%method, %path, status = response.status().as_u16(), "handled request");
    Ok(response)
}

async fn route(state: Arc<AppState>, req: Request<Body>) -> Result<Response<Body>, ApiError> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => json_response(&IndexResponse::new()),
        (&Method::GET, "/health") => json_response(&HealthResponse {
            status: "healthy",
            backend: state.service.backend_name().to_string(),
            cache: state.service.cache_stats(),
        }),
        (&Method::POST, "/calculate") => {
            let input: PsychroInput = read_json(req).await?;
            let result = blocking(state, move |s| s.calculate_state(&input)).await??;
            json_response(&StateResponse::from(result))
        }
        (&Method::POST, "/calculate-multiple") => {
            let body: MultiPointBody = read_json(req).await?;
            let pressure = body.pressure;
            let outcomes =
                blocking(state, move |s| s.calculate_multiple(pressure, &body.points)).await?;
            json_response(&MultiPointResponse {
                success: true,
                pressure,
                points: outcomes.into_iter().map(PointEntry::from).collect(),
            })
        }
        (&Method::POST, "/generate-chart") => {
            let body: ChartBody = read_json(req).await?;
            let dataset = blocking(state, move |s| {
                s.assemble_chart_data(body.pressure, &body.points, &body.process_lines)
            })
            .await?;
            json_response(&ChartResponse {
                success: true,
                dataset,
            })
        }
        (&Method::POST, "/reference-curves") => {
            let body: ReferenceBody = read_json(req).await?;
            let curves = blocking(state, move |s| s.reference_curves(body.pressure)).await??;
            json_response(&ReferenceResponse {
                success: true,
                curves,
            })
        }
        (&Method::POST, "/mixing") => {
            let body: MixingBody = read_json(req).await?;
            let result = blocking(state, move |s| {
                s.mix(body.pressure, &body.point1, &body.point2, body.ratio)
            })
            .await??;
            json_response(&MixingResponse::from(result))
        }
        (method, path) => Err(ApiError::NotFound {
            method: method.clone(),
            path: path.to_string(),
        }),
    }
}

/// Run engine work on the blocking pool.
async fn blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&PsychroService) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {e}")))
}

async fn read_json<T: DeserializeOwned>(req: Request<Body>) -> Result<T, ApiError> {
    let too_large = || ApiError::BadRequest(format!("body exceeds {MAX_BODY_BYTES} bytes"));

    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
        return Err(too_large());
    }

    let mut body = req.into_body();
    let mut bytes = Vec::with_capacity(declared.unwrap_or(0));
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
        if bytes.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn json_response<T: Serialize>(value: &T) -> Result<Response<Body>, ApiError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| ApiError::Internal(format!("failed to serialize response: {e}")))?;
    let mut response = Response::new(Body::from(bytes));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

fn preflight() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
    response
}
