pub mod artifact;
pub mod cache;
pub mod calculator;
pub mod time;

pub use artifact::JsonArtifactStore;
pub use cache::InMemoryResultCache;
pub use calculator::{CalculatorCredentials, CalculatorInvocation, ProcessJobRunner};
pub use time::SystemClock;
