// Alert headers attached to entity mutations and rejected requests.
//
// Header names are "X-{app}-alert", "X-{app}-params" and "X-{app}-error"; HTTP header names are
// case-insensitive, so they are emitted lowercase.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

fn insert(headers: &mut HeaderMap, name: String, value: &str) {
    match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => warn!("Skipping alert header '{}'", name),
    }
}

pub fn create_alert(application_name: &str, message: &str, param: &str) -> HeaderMap {
    let mut headers: HeaderMap = HeaderMap::new();
    insert(&mut headers, format!("x-{application_name}-alert"), message);
    insert(&mut headers, format!("x-{application_name}-params"), param);
    headers
}

pub fn entity_creation_alert(application_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    let message: String = format!("A new {entity_name} is created with identifier {param}");
    create_alert(application_name, &message, param)
}

pub fn entity_update_alert(application_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    let message: String = format!("A {entity_name} is updated with identifier {param}");
    create_alert(application_name, &message, param)
}

pub fn entity_deletion_alert(application_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    let message: String = format!("A {entity_name} is deleted with identifier {param}");
    create_alert(application_name, &message, param)
}

pub fn failure_alert(application_name: &str, entity_name: &str, error_key: &str) -> HeaderMap {
    let mut headers: HeaderMap = HeaderMap::new();
    insert(&mut headers, format!("x-{application_name}-error"), &format!("error.{error_key}"));
    insert(&mut headers, format!("x-{application_name}-params"), entity_name);
    headers
}
