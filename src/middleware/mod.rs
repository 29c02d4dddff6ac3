pub mod auth;
pub mod request_id;

pub use auth::{cookie_value, require_session, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
