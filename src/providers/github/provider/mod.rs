mod activity;
mod core;
mod repositories;

pub use self::core::{GitHubProvider, MissingRepoPolicy, ProviderOptions};

#[cfg(test)]
pub(crate) use self::core::test_support;
