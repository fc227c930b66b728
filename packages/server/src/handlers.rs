//! HTTP handler functions for the crime dashboard API.

use actix_web::{HttpResponse, web};
use crime_dash_analytics::DashboardError;
use crime_dash_analytics_models::{
    DashboardAction, DashboardRequest, ErrorKind, Selection, YearBounds,
};
use crime_dash_crime_models::CrimeSelector;
use crime_dash_server_models::{
    ApiError, ApiHealth, ApiPrediction, ComparisonQueryParams, DashboardQueryParams, PredictBody,
    TrendQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: state.dashboard.dataset().is_loaded(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_loaded: state.dashboard.dataset().is_loaded(),
        model_loaded: state.dashboard.model().is_loaded(),
    })
}

/// `GET /api/options`
///
/// Returns the state list, crime options, and year bounds for the
/// selectors.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    match state.dashboard.options() {
        Ok(options) => HttpResponse::Ok().json(options),
        Err(e) => error_response("load selector options", &e),
    }
}

/// `GET /api/dashboard`
///
/// Handles one dashboard interaction: always returns both chart series,
/// plus a prediction when `action=predict`.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let params = params.into_inner();

    let action = match params.action.as_deref() {
        None => DashboardAction::Refresh,
        Some(raw) => match raw.parse() {
            Ok(action) => action,
            Err(_) => {
                return HttpResponse::BadRequest()
                    .json(ApiError::invalid(format!("Unknown action '{raw}'")));
            }
        },
    };

    let bounds = match year_bounds(&state) {
        Ok(bounds) => bounds,
        Err(response) => return response,
    };
    let year = params.year.unwrap_or(bounds.default);
    if let Err(response) = check_year(&bounds, year) {
        return response;
    }

    let request = DashboardRequest {
        selection: Selection {
            state: params.state,
            crime: crime_param(params.crime),
            year,
        },
        action,
    };

    match state.dashboard.handle(&request) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response("handle dashboard request", &e),
    }
}

/// `POST /api/predict`
///
/// Runs the model for the posted selection.
pub async fn predict(state: web::Data<AppState>, body: web::Json<PredictBody>) -> HttpResponse {
    let selection = Selection::from(body.into_inner());

    let bounds = match year_bounds(&state) {
        Ok(bounds) => bounds,
        Err(response) => return response,
    };
    if let Err(response) = check_year(&bounds, selection.year) {
        return response;
    }

    match state.dashboard.predict(&selection) {
        Ok(prediction) => HttpResponse::Ok().json(ApiPrediction {
            selection,
            prediction,
        }),
        Err(e) => error_response("predict crime count", &e),
    }
}

/// `GET /api/trend`
pub async fn trend(
    state: web::Data<AppState>,
    params: web::Query<TrendQueryParams>,
) -> HttpResponse {
    let params = params.into_inner();
    let crime = crime_param(params.crime);
    match state.dashboard.trend(&params.state, &crime) {
        Ok(series) => HttpResponse::Ok().json(series),
        Err(e) => error_response("compute trend", &e),
    }
}

/// `GET /api/comparison`
pub async fn comparison(
    state: web::Data<AppState>,
    params: web::Query<ComparisonQueryParams>,
) -> HttpResponse {
    match state.dashboard.comparison(&params.state) {
        Ok(series) => HttpResponse::Ok().json(series),
        Err(e) => error_response("compute comparison", &e),
    }
}

/// Parses the optional crime parameter, defaulting to the combined
/// selection.
fn crime_param(raw: Option<String>) -> CrimeSelector {
    raw.map_or(CrimeSelector::Combined, CrimeSelector::from)
}

fn year_bounds(state: &AppState) -> Result<YearBounds, HttpResponse> {
    state
        .dashboard
        .year_bounds()
        .map_err(|e| error_response("load year bounds", &e))
}

fn check_year(bounds: &YearBounds, year: i32) -> Result<(), HttpResponse> {
    if bounds.contains(year) {
        Ok(())
    } else {
        Err(HttpResponse::BadRequest().json(ApiError::invalid(format!(
            "Year {year} is outside {}..={}",
            bounds.min, bounds.max
        ))))
    }
}

/// Logs a failed interaction and maps it to a JSON error response.
fn error_response(action: &str, e: &DashboardError) -> HttpResponse {
    log::error!("Failed to {action}: {e}");

    let body = ApiError {
        error: e.to_string(),
        kind: Some(e.kind()),
    };

    match e.kind() {
        ErrorKind::DataUnavailable | ErrorKind::ModelUnavailable => {
            HttpResponse::ServiceUnavailable().json(body)
        }
        ErrorKind::SchemaMismatch => HttpResponse::InternalServerError().json(body),
    }
}
