mod handlers;
mod routes;
mod types;

pub use handlers::ApiState;
pub use routes::create_router;
pub use types::ErrorResponse;
