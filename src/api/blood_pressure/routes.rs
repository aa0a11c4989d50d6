// Blood pressure route definitions, relative to the entry's path in the entity route table

use axum::{
    routing::get,
    Router,
};

use crate::config::state::AppState;
use super::handler;

/// Creates router with all blood pressure endpoints
pub fn blood_pressure_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handler::list_blood_pressures_handler)
                .post(handler::create_blood_pressure_handler)
                .put(handler::update_blood_pressure_handler),
        )
        .route("/_search", get(handler::search_blood_pressures_handler))
        .route(
            "/{id}",
            get(handler::get_blood_pressure_handler)
                .delete(handler::delete_blood_pressure_handler),
        )
}
