//! Authentication Module
//!
//! Password hashing, JWT handling and the account service built on them.

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, JwtAuth};
pub use password::{hash_password, verify_password};
pub use service::AuthService;
