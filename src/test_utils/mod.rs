//! Shared test utilities for skillpack.

pub mod fixtures;
pub mod logging;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{Result, SkillError};
use crate::storage::{MemoryStore, ObjectStore};

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
    pub should_panic: bool,
}

/// Run table-driven tests with detailed logging.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F)
where
    I: std::fmt::Debug + Clone,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E,
{
    for case in cases {
        let start = std::time::Instant::now();
        println!("[TEST] Running: {}", case.name);
        println!("[TEST] Input: {:?}", case.input);

        let input = case.input.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| test_fn(input)));
        let elapsed = start.elapsed();

        if case.should_panic {
            assert!(result.is_err(), "Test '{}' expected panic", case.name);
            println!("[TEST] PASSED: {} ({:?})\n", case.name, elapsed);
            continue;
        }

        let actual = result.unwrap_or_else(|_| panic!("Test '{}' panicked unexpectedly", case.name));

        println!("[TEST] Expected: {:?}", case.expected);
        println!("[TEST] Actual: {:?}", actual);
        assert_eq!(actual, case.expected, "Test '{}' failed", case.name);
        println!("[TEST] PASSED: {} ({:?})\n", case.name, elapsed);
    }
}

/// Object store that fails on demand, backed by a [`MemoryStore`].
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    puts_allowed: Option<usize>,
    puts_done: AtomicUsize,
    fail_gets: bool,
}

impl FailingStore {
    /// Let `n` puts succeed, then fail every later one.
    #[must_use]
    pub fn fail_puts_after(n: usize) -> Self {
        Self {
            puts_allowed: Some(n),
            ..Self::default()
        }
    }

    /// Fail every `get`; puts succeed.
    #[must_use]
    pub fn fail_gets() -> Self {
        Self {
            fail_gets: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl ObjectStore for FailingStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()> {
        let done = self.puts_done.fetch_add(1, Ordering::SeqCst);
        if self.puts_allowed.is_some_and(|allowed| done >= allowed) {
            return Err(SkillError::storage("put", key, "injected failure"));
        }
        self.inner.put(key, bytes, content_type)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        if self.fail_gets {
            return Err(SkillError::storage("get", key, "injected failure"));
        }
        self.inner.get(key)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.inner.list(prefix)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key)
    }

    fn signed_url(&self, key: &str, ttl: Duration) -> Result<String> {
        self.inner.signed_url(key, ttl)
    }
}
