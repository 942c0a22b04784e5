mod health;
mod url;

pub use health::{health_handler, home_handler};
pub use url::{create_url_handler, redirect_handler, stats_handler};
