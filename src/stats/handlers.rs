use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::state::AppState;
use crate::stats::aggregate;

// The original service tested filter parameters for truthiness, so an empty
// string (and a zero year) disables the filter instead of matching nothing.
// Reproduced deliberately; see DESIGN.md.
fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn non_zero(v: Option<i32>) -> Option<i32> {
    v.filter(|&y| y != 0)
}

fn default_top() -> usize {
    10
}

fn default_season() -> String {
    "Summer".to_string()
}

pub async fn home() -> Json<Value> {
    Json(json!({ "message": "Olympics ML Backend Running" }))
}

pub async fn get_countries(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "countries": aggregate::distinct_regions(&state.dataset) }))
}

pub async fn get_sports(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "sports": aggregate::distinct_sports(&state.dataset) }))
}

pub async fn get_years(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "years": aggregate::distinct_years(&state.dataset) }))
}

#[derive(Debug, Deserialize)]
pub struct MedalsByCountryParams {
    #[serde(default = "default_top")]
    top: usize,
    year: Option<i32>,
    season: Option<String>,
}

pub async fn medals_by_country(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MedalsByCountryParams>,
) -> Json<Value> {
    let ranked = aggregate::medals_by_country(
        &state.dataset,
        params.top,
        non_zero(params.year),
        non_empty(&params.season),
    );
    let mut map = Map::new();
    for (region, count) in ranked {
        map.insert(region, json!(count));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct MedalsByTypeParams {
    country: Option<String>,
    year: Option<i32>,
}

pub async fn medals_by_type(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MedalsByTypeParams>,
) -> Json<Value> {
    let pivot = aggregate::medals_by_type(
        &state.dataset,
        non_empty(&params.country),
        non_zero(params.year),
    );
    let mut map = Map::new();
    for (region, counts) in pivot {
        map.insert(region, json!(counts));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct GenderDistributionParams {
    country: Option<String>,
    year: Option<i32>,
    sport: Option<String>,
}

pub async fn gender_distribution(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenderDistributionParams>,
) -> Json<Value> {
    let counts = aggregate::gender_distribution(
        &state.dataset,
        non_empty(&params.country),
        non_zero(params.year),
        non_empty(&params.sport),
    );
    let mut map = Map::new();
    for (sex, count) in counts {
        map.insert(sex.as_str().to_string(), json!(count));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct AgeDistributionParams {
    country: Option<String>,
    sport: Option<String>,
}

pub async fn age_distribution(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AgeDistributionParams>,
) -> Json<Value> {
    let buckets = aggregate::age_distribution(
        &state.dataset,
        non_empty(&params.country),
        non_empty(&params.sport),
    );
    let mut map = Map::new();
    for (label, count) in buckets {
        map.insert(label, json!(count));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct MedalsOverTimeParams {
    country: Option<String>,
    season: Option<String>,
}

pub async fn medals_over_time(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MedalsOverTimeParams>,
) -> Json<Value> {
    let series = aggregate::medals_over_time(
        &state.dataset,
        non_empty(&params.country),
        non_empty(&params.season),
    );
    let mut map = Map::new();
    for (year, count) in series {
        map.insert(year.to_string(), json!(count));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct TopSportsParams {
    country: Option<String>,
    #[serde(default = "default_top")]
    top: usize,
}

pub async fn top_sports_by_medals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopSportsParams>,
) -> Json<Value> {
    let ranked = aggregate::top_sports_by_medals(
        &state.dataset,
        non_empty(&params.country),
        params.top,
    );
    let mut map = Map::new();
    for (sport, count) in ranked {
        map.insert(sport, json!(count));
    }
    Json(Value::Object(map))
}

pub async fn avg_age_by_sport(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopSportsParams>,
) -> Json<Value> {
    let ranked = aggregate::avg_age_by_sport(
        &state.dataset,
        non_empty(&params.country),
        params.top,
    );
    let mut map = Map::new();
    for (sport, mean) in ranked {
        map.insert(sport, json!(mean));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct SeasonParams {
    #[serde(default = "default_season")]
    season: String,
}

impl SeasonParams {
    /// Default is "Summer"; an explicit empty override means all seasons.
    fn filter(&self) -> Option<&str> {
        if self.season.is_empty() {
            None
        } else {
            Some(self.season.as_str())
        }
    }
}

pub async fn gender_over_time(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonParams>,
) -> Json<Value> {
    let series = aggregate::gender_over_time(&state.dataset, params.filter());
    let mut map = Map::new();
    for (sex, yearly) in series {
        let mut inner = Map::new();
        for (year, count) in yearly {
            inner.insert(year.to_string(), json!(count));
        }
        map.insert(sex.as_str().to_string(), Value::Object(inner));
    }
    Json(Value::Object(map))
}

pub async fn athlete_count_over_time(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeasonParams>,
) -> Json<Value> {
    let series = aggregate::athlete_count_over_time(&state.dataset, params.filter());
    let mut map = Map::new();
    for (year, count) in series {
        map.insert(year.to_string(), json!(count));
    }
    Json(Value::Object(map))
}

#[derive(Debug, Deserialize)]
pub struct CountryParams {
    country: String,
}

pub async fn country_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountryParams>,
) -> Json<Value> {
    let stats = aggregate::country_stats(&state.dataset, &params.country);
    Json(json!(stats))
}
