//! HTTP front end for the linkstat shortener.
//!
//! Routes:
//! - `POST /add` with `{"url": ...}` creates a short code
//! - `GET /u/{code}` redirects to the stored URL
//! - `GET /stats/{code}/access/{period}` reports hits for a window
//! - `GET /health` liveness probe

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod timing;

pub use app::App;
pub use state::AppState;
