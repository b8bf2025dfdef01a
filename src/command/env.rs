//! Scoped override of the toolchain search-path variable

use std::env;
use std::ffi::{OsStr, OsString};

/// Sets an environment variable for as long as the guard lives and puts the
/// previous value back (or removes the variable) when dropped.
///
/// Drop also runs while unwinding from a panic. Binaries must let the guard
/// go out of scope before the process exits, since `std::process::exit`
/// skips destructors.
#[derive(Debug)]
pub struct ToolchainEnv {
    var: String,
    previous: Option<OsString>,
}

impl ToolchainEnv {
    pub fn set(var: &str, value: impl AsRef<OsStr>) -> Self {
        let previous = env::var_os(var);
        // SAFETY: the binaries run on one thread. Test threads reach the
        // environment only through std (`env::var`, `Command::spawn`), which
        // shares the lock `set_var` takes, and env-mutating tests are
        // serialized.
        unsafe { env::set_var(var, value) };
        Self {
            var: var.to_string(),
            previous,
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    /// Value the variable had before the override
    pub fn previous(&self) -> Option<&OsStr> {
        self.previous.as_deref()
    }
}

impl Drop for ToolchainEnv {
    fn drop(&mut self) {
        // SAFETY: see `ToolchainEnv::set`.
        unsafe {
            match &self.previous {
                Some(value) => env::set_var(&self.var, value),
                None => env::remove_var(&self.var),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_restores_previous_value() {
        let _lock = env_lock();
        let var = "IMQS_BUILD_TEST_RESTORE_GOPATH";
        unsafe { env::set_var(var, "/original") };
        {
            let guard = ToolchainEnv::set(var, "/override");
            assert_eq!(env::var(var).unwrap(), "/override");
            assert_eq!(guard.previous(), Some(OsStr::new("/original")));
            assert_eq!(guard.var(), var);
        }
        assert_eq!(env::var(var).unwrap(), "/original");
        unsafe { env::remove_var(var) };
    }

    #[test]
    fn test_removes_variable_that_was_unset() {
        let _lock = env_lock();
        let var = "IMQS_BUILD_TEST_UNSET_GOPATH";
        unsafe { env::remove_var(var) };
        {
            let _guard = ToolchainEnv::set(var, "/override");
            assert!(env::var_os(var).is_some());
        }
        assert!(env::var_os(var).is_none());
    }

    #[test]
    fn test_restores_during_panic_unwind() {
        let _lock = env_lock();
        let var = "IMQS_BUILD_TEST_PANIC_GOPATH";
        unsafe { env::set_var(var, "/original") };
        let result = std::panic::catch_unwind(|| {
            let _guard = ToolchainEnv::set(var, "/override");
            panic!("step blew up");
        });
        assert!(result.is_err());
        assert_eq!(env::var(var).unwrap(), "/original");
        unsafe { env::remove_var(var) };
    }
}
