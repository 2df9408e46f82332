//! Tower layers applied to every route.

mod cors;

pub use cors::create_cors_layer;
