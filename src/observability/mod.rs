//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields. Each
//! invocation runs inside a `run` span carrying a UUID, so log lines from
//! one run can be correlated.

pub mod logging;
