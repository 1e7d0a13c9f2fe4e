use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{aircraft, health, hr, positions};
use super::state::AppState;

fn hr_routes() -> Router<AppState> {
    Router::new()
        .route("/db/init", post(hr::init_database))
        .route("/db/seed", post(hr::seed_database))
        .route("/departments", get(hr::list_departments))
        .route("/departments/", get(hr::list_departments))
        .route(
            "/departments/:dept_id/employees",
            get(hr::list_department_employees),
        )
        .route("/departments/:dept_id/stats", get(hr::department_stats))
        .route("/employees", get(hr::list_employees))
        .route("/employees/", get(hr::list_employees))
        .route(
            "/employees/:emp_id/salary-history",
            get(hr::salary_history),
        )
}

fn aircraft_routes() -> Router<AppState> {
    Router::new()
        .route("/aircraft/download", post(aircraft::download_data))
        .route("/aircraft/prepare", post(aircraft::prepare_data))
        .route("/aircraft", get(aircraft::list_aircraft))
        .route("/aircraft/", get(aircraft::list_aircraft))
        .route(
            "/aircraft/:icao/positions",
            get(aircraft::get_aircraft_positions),
        )
        .route(
            "/aircraft/:icao/stats",
            get(aircraft::get_aircraft_statistics),
        )
}

fn bucket_routes() -> Router<AppState> {
    Router::new()
        .route("/aircraft/download", post(aircraft::download_to_bucket))
        .route("/aircraft/prepare", post(aircraft::prepare_from_bucket))
}

fn position_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/aircraft",
            post(positions::create_position).get(positions::list_tracked_aircraft),
        )
        .route("/aircraft/", get(positions::list_tracked_aircraft))
        .route("/aircraft/stats", get(positions::type_stats))
        .route(
            "/aircraft/:icao",
            get(positions::latest_position).delete(positions::delete_positions),
        )
}

/// Builds the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/s5", hr_routes())
        .nest("/api/s1", aircraft_routes())
        .nest("/api/s4", bucket_routes())
        .nest("/api/s6", position_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
