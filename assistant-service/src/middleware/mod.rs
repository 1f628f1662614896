pub mod cors;

pub use cors::{cors_layer, origin_guard_middleware, AllowedOrigins};
