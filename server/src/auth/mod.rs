mod crypto;
mod middleware;

pub use middleware::require_function_secret;
