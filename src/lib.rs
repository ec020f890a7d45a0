//! Client-side simulation and orchestration core for exam-centre allotment.
//!
//! The crate owns everything between the rendering layer and the routing
//! backend: the synthetic-population sampler, the workflow state machine that
//! gates backend calls, and the merge of sparse assignment results with the
//! dense travel-time diagnostics matrix. Rendering and transport stay outside.

pub mod config;
pub mod contracts;
pub mod error;
pub mod geo;
pub mod logging;
pub mod merge;
pub mod models;
pub mod sampler;
pub mod session;
pub mod statistics;
pub mod workflow;

pub use error::AllotError;
pub use session::Session;
