//! Shared utilities.
//!
//! Test helpers for driving the executor without the real toolchain.

#[cfg(test)]
pub mod testutil;
