pub mod auth;
pub mod headers;
pub mod trace;

pub use auth::BearerAuth;
pub use headers::{API_VERSION, api_headers};
pub use trace::{HttpMakeSpan, HttpOnResponse, RouteLabel, UNMATCHED_ROUTE, X_REQUEST_ID};
