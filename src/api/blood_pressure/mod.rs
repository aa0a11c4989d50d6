// Blood pressure entity: model, mapping, storage, use cases and REST surface

pub mod handler;
pub mod mapper;
pub mod model;
pub mod repository;
pub mod routes;
pub mod search;
pub mod service;

pub use model::{BloodPressure, BloodPressureDto};
pub use routes::blood_pressure_routes;
