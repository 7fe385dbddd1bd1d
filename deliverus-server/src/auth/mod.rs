//! Authentication and authorization

pub mod extractor;
pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::{
    CUSTOMER, Check, GuardContext, GuardInput, OWNER, authenticate, guard, run_chain,
    user_for_token,
};
pub use jwt::{Claims, IssuedToken, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
