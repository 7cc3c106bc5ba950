//! Sources of environment parameters.
//!
//! The handler reads its environment exactly once, at the process boundary.
//! Everything downstream receives a [`HandlerConfig`](crate::HandlerConfig)
//! instead, so tests can substitute a plain map for the real environment.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Lookup capability for named string parameters.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when it is unset or not UTF-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads parameters from the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
