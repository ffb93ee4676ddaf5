//! Authentication and authorization module

pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;

pub use cookie::{clear_session_cookie, extract_session_token, session_cookie};
pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{session_middleware, AuthContext, Session};
pub use password::PasswordHasher;
pub use revocation::RevocationList;
