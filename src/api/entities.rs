// Entity route table: one entry per entity, matched in the order listed below

use crate::api::blood_pressure::blood_pressure_routes;
use crate::config::state::AppState;
use crate::routing::RouteTable;

/// Entries are appended at the marker; existing entries keep their position
pub fn entity_routes() -> RouteTable<AppState> {
    RouteTable::new()
        .register("/blood-pressure", blood_pressure_routes())
        // entity-needle-add-route - new entity routes are appended here
}
