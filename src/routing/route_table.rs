//! Ordered, first-match table of entity routes.
//!
//! # Responsibilities
//! - Keep (path prefix, component) entries in registration order
//! - Resolve a path relative to the mount to the first matching entry
//! - Freeze into a single axum service that dispatches through the same resolution
//!
//! # Matching
//! - Prefixes are segment-aware: `/blood-pressure` matches `/blood-pressure` and
//!   `/blood-pressure/7`, never `/blood-pressures`
//! - The matched prefix is stripped before the component sees the request
//! - No match means no component; the dispatcher answers with a 404 envelope
//!
//! The table is immutable once frozen, so dispatch takes no locks.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use tracing::{debug, warn};

use crate::routing::error_boundary::boundary_layer;
use crate::utils::response_handler::HandlerResponse;
use crate::utils::utils::normalize_path;

/// One registered association between a path prefix and the component serving it
#[derive(Debug)]
pub struct RouteEntry<S = ()> {
    path: String,
    component: Router<S>,
}

impl<S> RouteEntry<S> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn component(&self) -> &Router<S> {
        &self.component
    }
}

/// Registration-ordered route table; the first matching entry wins
#[derive(Debug)]
pub struct RouteTable<S = ()> {
    entries: Vec<RouteEntry<S>>,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<S> RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `component` under `path_suffix`. A path already in the table keeps its first entry.
    pub fn register(mut self, path_suffix: &str, component: Router<S>) -> Self {
        let path: String = normalize_path(path_suffix);

        if self.entries.iter().any(|entry| entry.path == path) {
            warn!(path = %path, "Route already registered, keeping the first entry");
            return self;
        }

        debug!(path = %path, position = self.entries.len(), "Registered route");
        self.entries.push(RouteEntry { path, component });
        self
    }

    /// First entry whose prefix matches `current_path`, if any
    pub fn resolve(&self, current_path: &str) -> Option<&RouteEntry<S>> {
        self.entries
            .iter()
            .find(|entry| matches_prefix(&entry.path, current_path))
    }

    /// Registered paths in match priority order
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds every component to `state`, wraps each one in its own failure boundary and returns a
    /// router that dispatches by first match
    pub fn into_router(self, state: S) -> Router {
        let entries: Vec<RouteEntry> = self
            .entries
            .into_iter()
            .map(|entry| {
                let component: Router = entry
                    .component
                    .with_state(state.clone())
                    .layer(boundary_layer(&entry.path));
                RouteEntry { path: entry.path, component }
            })
            .collect();

        // Frozen: same entries and order, components bound to state
        let frozen: Arc<RouteTable> = Arc::new(RouteTable { entries });

        Router::new()
            .fallback(dispatch)
            .with_state(frozen)
    }
}

/// Segment-aware prefix check; the root prefix matches every path
pub fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Removes the matched prefix from the request path, keeping the query string
fn strip_route_prefix(uri: &Uri, prefix: &str) -> Option<Uri> {
    let rest: &str = if prefix == "/" {
        uri.path()
    } else {
        uri.path().strip_prefix(prefix)?
    };
    let rest: &str = if rest.is_empty() { "/" } else { rest };

    let path_and_query: String = match uri.query() {
        Some(query) => format!("{rest}?{query}"),
        None => rest.to_string(),
    };

    let mut parts: axum::http::uri::Parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

async fn dispatch(State(table): State<Arc<RouteTable>>, mut request: Request) -> Response {
    let path: String = request.uri().path().to_string();

    let Some(route) = table.resolve(&path) else {
        debug!(path = %path, "No route matched");
        return HandlerResponse::new(StatusCode::NOT_FOUND)
            .data(json!({ "error": "no_route", "path": path }))
            .message("No component is registered for this path")
            .into_response();
    };

    match strip_route_prefix(request.uri(), &route.path) {
        Some(uri) => *request.uri_mut() = uri,
        None => {
            warn!(path = %path, route = %route.path, "Could not rewrite request path");
            return StatusCode::BAD_REQUEST.into_response();
        }
    }

    debug!(path = %path, route = %route.path, "Dispatching to route component");
    route
        .component
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never: Infallible| match never {})
}
