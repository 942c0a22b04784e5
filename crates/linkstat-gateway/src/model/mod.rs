mod url;

pub use url::{CreateUrlRequest, CreateUrlResponse, ErrorResponse, HealthResponse, StatsResponse};
