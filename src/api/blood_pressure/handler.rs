// Blood pressure REST handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{header::LOCATION, StatusCode, Uri},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::api::blood_pressure::model::{BloodPressureDto, ENTITY_NAME};
use crate::config::state::AppState;
use crate::utils::error_handler::ApiError;
use crate::utils::header_util;
use crate::utils::pagination::{generate_pagination_headers, Page, PageRequest};
use crate::utils::response_handler::HandlerResponse;

/// `?query=` is required; an empty value matches every reading
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// Turns a handler result into the response envelope, rendering errors with the app's alert headers
fn respond(state: &AppState, result: Result<HandlerResponse, ApiError>) -> HandlerResponse {
    result.unwrap_or_else(|e| e.into_handler_response(&state.environment.client_app_name))
}

fn read_payload(
    payload: Result<Json<BloodPressureDto>, JsonRejection>,
) -> Result<BloodPressureDto, HandlerResponse> {
    payload.map(|Json(dto)| dto).map_err(|rejection| {
        warn!("Rejected blood pressure payload: {}", rejection.body_text());
        // Keeps 413 for oversized bodies and 415 for a wrong content type
        HandlerResponse::new(rejection.status())
            .data(json!({ "error": "invalid_payload", "details": rejection.body_text() }))
            .message("Request body is not a valid bloodPressure")
    })
}

fn page_response(uri: &Uri, page: Page<BloodPressureDto>) -> HandlerResponse {
    let headers = generate_pagination_headers(uri, &page);
    HandlerResponse::new(StatusCode::OK)
        .data(json!(page.content))
        .headers(headers)
}

/// Creates a reading; answers 201 with its location
#[instrument(name = "create_blood_pressure", skip(state, payload))]
pub async fn create_blood_pressure_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<BloodPressureDto>, JsonRejection>,
) -> HandlerResponse {
    let dto: BloodPressureDto = match read_payload(payload) {
        Ok(dto) => dto,
        Err(response) => return response,
    };

    let result = async {
        let created: BloodPressureDto = state.blood_pressures.create(dto).await?;
        let id: String = created.id.map(|id| id.to_string()).unwrap_or_default();
        info!("Created blood pressure reading {}", id);

        let location: String = format!("{}/{}", uri.path().trim_end_matches('/'), id);
        Ok::<HandlerResponse, ApiError>(HandlerResponse::new(StatusCode::CREATED)
            .data(json!(created))
            .message("Blood pressure reading created")
            .header(LOCATION.as_str(), location)
            .headers(header_util::entity_creation_alert(
                &state.environment.client_app_name,
                ENTITY_NAME,
                &id,
            )))
    }
    .await;

    respond(&state, result)
}

/// Replaces an existing reading identified by the payload's id
#[instrument(name = "update_blood_pressure", skip(state, payload))]
pub async fn update_blood_pressure_handler(
    State(state): State<AppState>,
    payload: Result<Json<BloodPressureDto>, JsonRejection>,
) -> HandlerResponse {
    let dto: BloodPressureDto = match read_payload(payload) {
        Ok(dto) => dto,
        Err(response) => return response,
    };

    let result = async {
        let updated: BloodPressureDto = state.blood_pressures.update(dto).await?;
        let id: String = updated.id.map(|id| id.to_string()).unwrap_or_default();

        Ok::<HandlerResponse, ApiError>(HandlerResponse::new(StatusCode::OK)
            .data(json!(updated))
            .message("Blood pressure reading updated")
            .headers(header_util::entity_update_alert(
                &state.environment.client_app_name,
                ENTITY_NAME,
                &id,
            )))
    }
    .await;

    respond(&state, result)
}

/// Lists a page of readings with `X-Total-Count` and `Link` headers
#[instrument(name = "list_blood_pressures", skip(state, uri))]
pub async fn list_blood_pressures_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(page): Query<PageRequest>,
) -> HandlerResponse {
    let result = state
        .blood_pressures
        .find_all(page)
        .await
        .map(|page| page_response(&uri, page));

    respond(&state, result)
}

#[instrument(name = "get_blood_pressure", skip(state))]
pub async fn get_blood_pressure_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResponse {
    let result = state
        .blood_pressures
        .find_one(id)
        .await
        .and_then(|found| found.ok_or(ApiError::NotFound { entity_name: ENTITY_NAME, id }))
        .map(|dto| HandlerResponse::new(StatusCode::OK).data(json!(dto)));

    respond(&state, result)
}

#[instrument(name = "delete_blood_pressure", skip(state))]
pub async fn delete_blood_pressure_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResponse {
    let result = state.blood_pressures.delete(id).await.map(|()| {
        info!("Deleted blood pressure reading {}", id);
        HandlerResponse::new(StatusCode::NO_CONTENT).headers(header_util::entity_deletion_alert(
            &state.environment.client_app_name,
            ENTITY_NAME,
            &id.to_string(),
        ))
    });

    respond(&state, result)
}

/// Searches readings; pagination works as for the listing
#[instrument(name = "search_blood_pressures", skip(state, uri))]
pub async fn search_blood_pressures_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<SearchParams>, QueryRejection>,
    Query(page): Query<PageRequest>,
) -> HandlerResponse {
    let params: SearchParams = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!("Rejected search parameters: {}", rejection.body_text());
            return HandlerResponse::new(rejection.status())
                .data(json!({ "error": "invalid_query", "details": rejection.body_text() }))
                .message("The query parameter is required")
                .headers(header_util::failure_alert(
                    &state.environment.client_app_name,
                    ENTITY_NAME,
                    "queryrequired",
                ));
        }
    };

    let result = state
        .blood_pressures
        .search(&params.query, page)
        .await
        .map(|page| page_response(&uri, page));

    respond(&state, result)
}
