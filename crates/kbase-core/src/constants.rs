pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

pub const API_VERSION: &str = "v1";

/// Business return codes found in the `code` field of every response.
pub mod ret_code {
    pub const SUCCESS: i64 = 0;
    pub const NOT_EFFECTIVE: i64 = 10;
    pub const EXCEPTION_ERROR: i64 = 100;
    pub const ARGUMENT_ERROR: i64 = 101;
    pub const DATA_ERROR: i64 = 102;
    pub const OPERATING_ERROR: i64 = 103;
    pub const CONNECTION_ERROR: i64 = 105;
    pub const RUNNING: i64 = 106;
    pub const PERMISSION_ERROR: i64 = 108;
    pub const AUTHENTICATION_ERROR: i64 = 109;
    pub const UNAUTHORIZED: i64 = 401;
    pub const FORBIDDEN: i64 = 403;
    pub const NOT_FOUND: i64 = 404;
    pub const SERVER_ERROR: i64 = 500;
}
