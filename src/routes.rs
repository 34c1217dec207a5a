use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{ml, stats};

/// Builds the full application router. Cross-origin access is restricted to
/// the single configured origin, GET only, with credentials allowed.
pub fn app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let origin = state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("Invalid ALLOWED_ORIGIN value: {}", e))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let router = Router::new()
        .route("/", get(stats::home))
        // Filter enumerators
        .route("/filters/countries", get(stats::get_countries))
        .route("/filters/sports", get(stats::get_sports))
        .route("/filters/years", get(stats::get_years))
        // Chart aggregations
        .route("/medals-by-country", get(stats::medals_by_country))
        .route("/medals-by-type", get(stats::medals_by_type))
        .route("/gender-distribution", get(stats::gender_distribution))
        .route("/age-distribution", get(stats::age_distribution))
        .route("/medals-over-time", get(stats::medals_over_time))
        .route("/top-sports-by-medals", get(stats::top_sports_by_medals))
        .route("/avg-age-by-sport", get(stats::avg_age_by_sport))
        .route("/gender-over-time", get(stats::gender_over_time))
        .route("/athlete-count-over-time", get(stats::athlete_count_over_time))
        .route("/country-stats", get(stats::country_stats))
        // ML endpoints backed by the loaded artifacts
        .route("/train-model", get(ml::train_model))
        .route("/predict-medal", get(ml::predict_medal))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
