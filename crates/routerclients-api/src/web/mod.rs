// Router web management API (ASUSWRT `appGet.cgi` family)
//
// There is no published API; these endpoints are what the router's own
// web UI calls. `auth` covers login/logout, `client` the hook requests,
// `models` the JSON shapes.

pub mod auth;
pub mod client;
pub mod models;

pub use client::{AsusWebClient, SESSION_COOKIE, SessionToken};
pub use models::ClientRecord;
