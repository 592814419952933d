//! Authentication and authorization
//!
//! Password hashing, signed access tokens, bearer-token resolution and the
//! role-ladder access policy.

pub mod jwt;
pub mod password;
pub mod policy;
pub mod resolver;

pub use jwt::{Claims, JwtKeys};
pub use password::{hash_password, verify_password};
pub use policy::Caller;
pub use resolver::{extract_bearer, TokenResolver};
