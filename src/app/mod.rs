pub mod ports;
pub mod projections_use_case;
pub mod session_service;

pub use projections_use_case::{CsvExport, ProjectionView, ProjectionsUseCase};
pub use session_service::{SessionService, SessionToken};
