//! Bounded retry with a fixed delay between attempts.
//!
//! The final rename of a freshly built archive can fail transiently when
//! another process (indexer, antivirus) briefly holds the file open. Both
//! the package and collection install steps share this utility rather than
//! each carrying its own sleep loop.

use std::thread;
use std::time::Duration;

/// How many times to attempt an operation and how long to wait between
/// failures. The default matches the install protocol: 10 attempts, 1 s
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy for tests and callers that cannot tolerate sleeping.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Run `op` up to `policy.attempts` times, sleeping `policy.delay` between
/// failed attempts. Returns the first success, or the last error once
/// attempts are exhausted. A policy of zero attempts never runs `op` and
/// panics by contract — every call site uses at least one attempt.
pub fn retry<T, E>(policy: RetryPolicy, mut op: impl FnMut() -> Result<T, E>) -> Result<T, E> {
    assert!(policy.attempts > 0, "retry policy must allow at least one attempt");

    let mut last_err = None;
    for attempt in 0..policy.attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => last_err = Some(e),
        }
        if attempt + 1 < policy.attempts && !policy.delay.is_zero() {
            thread::sleep(policy.delay);
        }
    }
    // attempts > 0, so at least one iteration ran and stored an error
    Err(last_err.unwrap())
}
