//! Scoped override of the toolchain's search-path variable.

use std::ffi::{OsStr, OsString};
use tracing::debug;

/// Sets an environment variable for as long as the guard lives.
///
/// The previous value is captured on [`SearchPathGuard::acquire`] and put back when
/// the guard is dropped, on success, error and unwind alike. A variable that was
/// unset before is removed again.
///
/// # Example
///
/// ```rust,no_run
/// use vend::build::SearchPathGuard;
///
/// {
///     let _guard = SearchPathGuard::acquire("GOPATH", "/project/vendor");
///     // The toolchain sees GOPATH=/project/vendor here
/// }
/// // GOPATH is back to its previous value
/// ```
#[derive(Debug)]
pub struct SearchPathGuard {
    var: String,
    previous: Option<OsString>,
}

impl SearchPathGuard {
    /// Set `var` to `value`, remembering the current value.
    pub fn acquire(var: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        let var = var.into();
        let previous = std::env::var_os(&var);
        debug!(var = %var, value = ?value.as_ref(), "Overriding search path");
        // SAFETY: the binary runs a current-thread runtime and the toolchain is the
        // only other reader; no thread reads the environment concurrently.
        unsafe {
            std::env::set_var(&var, value);
        }
        Self {
            var,
            previous,
        }
    }

    /// The value the variable had before the guard was acquired.
    #[must_use]
    pub fn previous(&self) -> Option<&OsStr> {
        self.previous.as_deref()
    }
}

impl Drop for SearchPathGuard {
    fn drop(&mut self) {
        // SAFETY: see `acquire`.
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var(&self.var, value),
                None => std::env::remove_var(&self.var),
            }
        }
        debug!(var = %self.var, "Search path restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VAR: &str = "VEND_TEST_SEARCH_PATH";

    #[test]
    #[serial]
    fn test_restores_previous_value() {
        unsafe {
            std::env::set_var(VAR, "/original");
        }
        {
            let guard = SearchPathGuard::acquire(VAR, "/vendor");
            assert_eq!(std::env::var(VAR).unwrap(), "/vendor");
            assert_eq!(guard.previous(), Some(OsStr::new("/original")));
        }
        assert_eq!(std::env::var(VAR).unwrap(), "/original");
        unsafe {
            std::env::remove_var(VAR);
        }
    }

    #[test]
    #[serial]
    fn test_removes_previously_unset_variable() {
        unsafe {
            std::env::remove_var(VAR);
        }
        {
            let _guard = SearchPathGuard::acquire(VAR, "/vendor");
            assert!(std::env::var_os(VAR).is_some());
        }
        assert!(std::env::var_os(VAR).is_none());
    }

    #[test]
    #[serial]
    fn test_restores_on_error_path() {
        fn failing_step() -> anyhow::Result<()> {
            let _guard = SearchPathGuard::acquire(VAR, "/vendor");
            anyhow::bail!("toolchain exploded")
        }

        unsafe {
            std::env::set_var(VAR, "/original");
        }
        assert!(failing_step().is_err());
        assert_eq!(std::env::var(VAR).unwrap(), "/original");
        unsafe {
            std::env::remove_var(VAR);
        }
    }
}
