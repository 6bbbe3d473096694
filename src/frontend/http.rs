use std::{
    future::Future,
    net::{AddrParseError, IpAddr, SocketAddr},
    sync::Arc,
};

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use warp::{
    filters::body::BodyDeserializeError,
    hyper::StatusCode,
    reject::{LengthRequired, PayloadTooLarge, UnsupportedMediaType},
    Filter, Rejection, Reply,
};

use crate::{
    analyzer::{
        mafrepo::{MafRepoProcedureAnalyzer, PLUGIN_NAME},
        AnalyzerError,
    },
    config::schema::HttpFrontend,
    data_types::OutputRecord,
};

const PLUGINS_PATH: &str = "plugins";
const REQUEST_SIMPLE_VARIANTS: &str = "requestSimpleVariants";

// The input is a single sample id
const MAX_BODY_SIZE: u64 = 16 * 1024;

// `status.code` values the form script checks
const STATUS_CODE_OK: u8 = 1;
const STATUS_CODE_ERROR: u8 = 0;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Error parsing the listen address: {0}")]
    InvalidAddress(#[from] AddrParseError),

    #[error("Error binding the HTTP frontend: {0}")]
    Bind(#[from] warp::Error),
}

fn error_status(err: &AnalyzerError) -> StatusCode {
    match err {
        AnalyzerError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        AnalyzerError::ConfigurationMissing { .. }
        | AnalyzerError::InvalidConfiguration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AnalyzerError::RemoteServiceError(_)
        | AnalyzerError::MissingRequiredField { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn success_reply(records: Vec<OutputRecord>) -> warp::reply::Response {
    warp::reply::json(&json!({
        "status": { "code": STATUS_CODE_OK },
        "result": records,
    }))
    .into_response()
}

fn status_reply(message: String, status: StatusCode) -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&json!({
            "status": { "code": STATUS_CODE_ERROR, "message": message },
        })),
        status,
    )
    .into_response()
}

fn error_reply(err: &AnalyzerError) -> warp::reply::Response {
    status_reply(err.to_string(), error_status(err))
}

// Unreadable bodies still get the status envelope; routing rejections (404, 405)
// pass through untouched
async fn handle_rejection(rejection: Rejection) -> Result<warp::reply::Response, Rejection> {
    let (message, status) = if let Some(err) = rejection.find::<BodyDeserializeError>() {
        (err.to_string(), StatusCode::BAD_REQUEST)
    } else if let Some(err) = rejection.find::<PayloadTooLarge>() {
        (err.to_string(), StatusCode::PAYLOAD_TOO_LARGE)
    } else if let Some(err) = rejection.find::<LengthRequired>() {
        (err.to_string(), StatusCode::LENGTH_REQUIRED)
    } else if let Some(err) = rejection.find::<UnsupportedMediaType>() {
        (err.to_string(), StatusCode::UNSUPPORTED_MEDIA_TYPE)
    } else {
        return Err(rejection);
    };

    warn!("{REQUEST_SIMPLE_VARIANTS} rejected: {message}");
    Ok(status_reply(message, status))
}

// POST /plugins/MafRepoProcedureAnalyzer/requestSimpleVariants
pub fn request_simple_variants(
    analyzer: Arc<MafRepoProcedureAnalyzer>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path(PLUGINS_PATH)
        .and(warp::path(PLUGIN_NAME))
        .and(warp::path(REQUEST_SIMPLE_VARIANTS))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_SIZE))
        .and(warp::body::json())
        .then(move |body: Value| {
            let analyzer = analyzer.clone();
            async move {
                // Anything but an object carries no sampleId
                let input = match body {
                    Value::Object(input) => input,
                    other => {
                        debug!("Plugin method input is not an object: {other}");
                        Map::new()
                    }
                };

                match analyzer.request_simple_variants(&input).await {
                    Ok(records) => success_reply(records),
                    Err(err) => {
                        warn!("{REQUEST_SIMPLE_VARIANTS} failed: {err}");
                        error_reply(&err)
                    }
                }
            }
        })
        .recover(handle_rejection)
}

pub fn filters(
    analyzer: Arc<MafRepoProcedureAnalyzer>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type"])
        .allow_methods(vec!["POST"]);

    request_simple_variants(analyzer).with(cors)
}

pub async fn run_server(
    analyzer: Arc<MafRepoProcedureAnalyzer>,
    config: HttpFrontend,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let filters = filters(analyzer);

    let socket_addr = SocketAddr::new(config.bind_host.parse::<IpAddr>()?, config.bind_port);
    let (bound_addr, server) =
        warp::serve(filters).try_bind_with_graceful_shutdown(socket_addr, shutdown)?;

    info!("Starting the HTTP frontend on {bound_addr}");
    server.await;
    info!("HTTP frontend shut down");

    Ok(())
}
