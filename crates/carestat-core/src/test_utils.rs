//! Helpers for unit tests that touch process-wide environment variables

use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Serializes tests that read or write environment variables
pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Sets environment variables and restores the previous values on drop
#[derive(Default)]
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    /// Set `key` for the lifetime of this guard
    pub fn set(&mut self, key: &str, value: &str) {
        self.saved.push((key.to_string(), env::var(key).ok()));
        // SAFETY: callers hold ENV_LOCK, so no other test thread touches the environment.
        unsafe { env::set_var(key, value) };
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: see `set`.
            unsafe {
                match previous {
                    Some(value) => env::set_var(&key, value),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}
