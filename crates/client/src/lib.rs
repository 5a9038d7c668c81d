//! # Helpdesk Client
//!
//! Transport and session layer for the helpdesk REST API.
//!
//! This crate contains:
//! - [`credentials`]: the `CredentialStore` capability and the in-memory
//!   implementation used by tests and short-lived processes
//! - [`token`]: access-token claim decoding at the trust boundary
//! - [`session`]: login/logout/refresh with single-flight refresh coalescing
//! - [`transport`]: the authenticated `ApiClient` implementing the
//!   retry-once-after-refresh protocol
//! - [`wire`]: DTOs matching the backend's JSON shapes
//!
//! The crate owns no ticket state; the repository in `helpdesk-core` builds
//! on top of it.

pub mod config;
pub mod credentials;
pub mod session;
pub mod token;
pub mod transport;
pub mod wire;

pub use config::ClientConfig;
pub use credentials::{CredentialStore, InMemoryCredentialStore, TokenPair};
pub use session::SessionManager;
pub use token::decode_identity;
pub use transport::{ApiClient, MultipartPart};
