//! Probing and scan orchestration.
//!
//! [`scanner::Scanner`] is the entry point: it takes expanded targets and a port
//! specification, fans probes out through a bounded [`pool::WorkerPool`] and returns a
//! [`scanr_common::report::ScanReport`].

pub mod aggregate;
pub mod error;
pub mod network;
pub mod pool;
pub mod prober;
pub mod scanner;

pub use error::ProbeError;
pub use prober::{NetProber, Prober};
pub use scanner::{Phase, Scanner};
