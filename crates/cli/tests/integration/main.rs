//! Release integration tests.
//!
//! These run the real binary against fake `go` and `gsutil` executables, so
//! they only build on Unix.

#![cfg(unix)]

mod common;
mod release_tests;
