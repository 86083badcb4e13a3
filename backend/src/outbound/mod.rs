//! Driven adapters: implementations of the domain's outbound ports.

pub mod password;
pub mod persistence;
pub mod token;

pub use password::Argon2PasswordHasher;
pub use token::JwtTokenService;
