mod cluster_source;
mod geo_provider;
mod rate_limiter;

pub use cluster_source::ClusterSource;
pub use geo_provider::GeoProvider;
pub use rate_limiter::RateLimiter;
