//! Ordered fallback chains.
//!
//! Most fields are recovered by trying several sources in decreasing order of
//! reliability and keeping the first one that produces a value. [`Fallback`]
//! captures that shape once so extractors read as a list of attempts.
//!
//! ```rust
//! use sitespec_core::fallback::Fallback;
//!
//! let title = Fallback::new()
//!     .or_try(|| None)
//!     .or_try(|| Some("from <title>".to_string()))
//!     .or_try(|| unreachable!("later attempts are not evaluated"))
//!     .unwrap_or_else(|| "Unknown name".to_string());
//!
//! assert_eq!(title, "from <title>");
//! ```

/// A chain of attempts where the first `Some` wins.
#[derive(Debug, Clone)]
#[must_use]
pub struct Fallback<T> {
    found: Option<T>,
}

impl<T> Fallback<T> {
    pub fn new() -> Self {
        Self { found: None }
    }

    /// Runs `attempt` only if nothing has been found yet.
    pub fn or_try(self, attempt: impl FnOnce() -> Option<T>) -> Self {
        match self.found {
            Some(_) => self,
            None => Self { found: attempt() },
        }
    }

    pub fn finish(self) -> Option<T> {
        self.found
    }

    pub fn unwrap_or_else(self, default: impl FnOnce() -> T) -> T {
        self.found.unwrap_or_else(default)
    }
}

impl<T> Default for Fallback<T> {
    fn default() -> Self {
        Self::new()
    }
}
