pub mod chart;
pub mod csv_service;
pub mod provider;
pub mod yahoo;

pub use chart::*;
pub use csv_service::*;
pub use provider::*;
pub use yahoo::*;
