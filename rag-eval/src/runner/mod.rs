//! Response collection engine

pub mod collector;
pub mod rate_limiter;

pub use collector::{
    Collector, CollectorConfig, ConsoleProgress, NoOpProgress, ProgressCallback, ResponseMap,
};
pub use rate_limiter::RateLimiter;
