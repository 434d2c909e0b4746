//! Session domain module.
//!
//! This module contains the query session types shared by the controller and
//! the renderers.
//!
//! # Module Structure
//!
//! - `query`: User query type (`Query`), input buffer (`QuerySubmitter`) and the
//!   `QueryHandler` seam implemented by the controller
//! - `state`: Session lifecycle state (`SessionState`, `RequestId`)
//! - `result`: Normalized view models (`AnalysisResult`, `ChartPoint`, `TableRow`)

mod query;
mod result;
mod state;

// Re-export public API
pub use query::{Query, QueryHandler, QuerySubmitter};
pub use result::{AnalysisResult, AreaSeries, ChartPoint, TableRow};
pub use state::{RequestId, SessionState};
