//! Self-provisioning launcher for the grit binaries.
//!
//! Given a logical binary name, this crate ensures a matching
//! platform-specific release exists in the local cache (downloading and
//! installing it on first use) and then transfers execution to it,
//! forwarding all arguments and inheriting the standard streams.
//!
//! The pipeline is synchronous and single-threaded. The only concurrency
//! concern is independent launcher processes racing on a first install;
//! that is handled by staging each install privately and committing it
//! with a locked atomic rename (see [`provision`]).

pub mod cache;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod launch;
pub mod platform;
pub mod provision;

pub use cache::CacheLayout;
pub use error::{Error, Result};
pub use launch::run;
pub use platform::{Arch, Os, Platform};
pub use provision::{ProvisionRequest, Provisioner, TOOL, VERSION};
