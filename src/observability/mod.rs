//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Caller creates a Trace per logical operation
//!     → trace.rs (trace id + span id)
//!     → passed by reference into every HTTP call
//!     → attached as request headers and log fields
//!
//! All subsystems produce:
//!     → logging.rs (structured log events)
//! ```

pub mod logging;
pub mod trace;

pub use logging::init_logging;
pub use trace::Trace;
