// file: src/repository/mod.rs
// description: Repository addressing, credentials and ref verification exports
// reference: Internal module structure

pub mod credentials;
pub mod locator;
pub mod refs;

pub use credentials::Credentials;
pub use locator::{DEFAULT_REF, GITHUB_SCHEME, RepositoryLocator};
pub use refs::{GitHubRefVerifier, RefVerifier, SkipRefCheck};
