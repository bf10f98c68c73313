pub mod verified_user;

pub use verified_user::{TokenVerifier, UserClaims, VerifiedUser};
