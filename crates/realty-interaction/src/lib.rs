//! Request orchestration for the Realty client.
//!
//! - `analyze_api_client`: the `AnalysisService` seam and its HTTP implementation
//! - `session_controller`: the query lifecycle state machine

pub mod analyze_api_client;
pub mod session_controller;

pub use analyze_api_client::{AnalysisService, HttpAnalysisClient};
pub use session_controller::SessionController;
