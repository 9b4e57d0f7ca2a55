//! HTTP server hosting the relay
//!
//! - GET / - Service banner
//! - GET /health - Health check
//! - GET /participants - Currently registered participants
//! - GET /conversation - WebSocket endpoint for participants

mod conversation;
mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
