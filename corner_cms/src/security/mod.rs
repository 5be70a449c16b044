//! Security module providing brute-force lockout tracking.
//!
//! The lockout tracker throttles credential stuffing against individual
//! accounts: failures are counted per login identifier, not per client
//! address, so an attacker cannot dodge the counter by rotating IPs. The
//! flip side — a distributed attack spread across many identifiers is not
//! stopped here — is an explicit non-goal.
//!
//! State is process-local and in-memory. A restart silently resets all
//! counters, and a multi-process deployment gets independent counters per
//! process; both are accepted limitations rather than bugs.

pub mod lockout;

pub use lockout::{Clock, LockoutConfig, LockoutDecision, LockoutTracker};
