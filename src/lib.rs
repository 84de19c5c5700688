//! chart-graphic: declarative overlay graphics for imperative charts.
//!
//! Elements declared across render passes register with a per-chart
//! collector; coalesced flushes rebuild a nested scene in the chart host's
//! wire format and keep chart-level event listeners routed to each element's
//! current handlers.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{GraphicConfig, GraphicIntegration};
pub use error::{GraphicError, GraphicResult};
