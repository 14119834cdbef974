//! Blueprint source resolution.
//!
//! Turns a user-supplied blueprint reference into a local definition file.
//! It handles:
//! - Local definition files (`.yaml`, `.yml`, or any existing file)
//! - Local archives (`zip`, `tar`, `tar.gz`, `tar.bz2`)
//! - Remote archive URLs (http, https)
//! - Repository shorthands (`organization/repository[:ref]`)

mod fetch;
mod identity;
mod resolver;
mod shorthand;
mod spec;

pub use fetch::{ArchiveFetcher, HttpFetcher, archive_file_name};
pub use identity::archive_identity;
pub use resolver::{BlueprintResolver, ResolvedBlueprint, TempDirGuard};
pub use shorthand::{DEFAULT_REF, GitHubResolver, RepoShorthand, ShorthandResolver};
pub use spec::BlueprintSource;
