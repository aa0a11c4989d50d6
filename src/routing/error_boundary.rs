// Failure isolation for a single route table entry.
//
// A panic raised while an entry handles a request is caught at the entry's edge and turned into a
// 500 envelope; sibling entries and the shell keep serving.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tracing::error;

use crate::utils::response_handler::HandlerResponse;

/// Builds the 500 response for a panic inside one route entry
#[derive(Debug, Clone)]
pub struct BoundaryResponder {
    route: Arc<str>,
}

impl ResponseForPanic for BoundaryResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let details: &str = panic_message(err.as_ref());
        error!(route = %self.route, panic = %details, "Route component panicked");

        HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
            .data(json!({
                "error": "route_component_failed",
                "route": self.route.as_ref(),
            }))
            .message("The requested component failed to render")
            .into_response()
    }
}

/// Panic-catching layer for the entry registered at `route`
pub fn boundary_layer(route: &str) -> CatchPanicLayer<BoundaryResponder> {
    CatchPanicLayer::custom(BoundaryResponder { route: Arc::from(route) })
}

fn panic_message(err: &(dyn Any + Send)) -> &str {
    if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&'static str>() {
        s
    } else {
        "unknown panic payload"
    }
}
