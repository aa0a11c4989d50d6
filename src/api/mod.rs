// Start of file: /src/api/mod.rs

pub mod blood_pressure;
pub mod entities;

// End of file: /src/api/mod.rs
