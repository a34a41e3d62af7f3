pub mod resolver_stats;
pub mod runner;

pub use resolver_stats::ResolverStatsJob;
pub use runner::JobRunner;
