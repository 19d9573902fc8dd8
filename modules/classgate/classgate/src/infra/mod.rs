pub mod jwks;
pub mod jwt;
pub mod signer;

pub use jwks::{CachedJwks, FileJwks, JwksError, JwksProvider, StaticJwks};
pub use jwt::JwtVerifier;
pub use signer::{SessionTokenSigner, SignError};
