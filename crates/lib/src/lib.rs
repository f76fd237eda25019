//! datacol-dist-lib: release workflow for datacol binaries
//!
//! This crate provides the pieces of a release run:
//! - `ReleaseConfig`: immutable configuration read once from the environment
//! - `Target` / `Environment`: the platform matrix to cross-compile for
//! - `Step`: named workflow steps, each planned into `ReleaseAction`s
//! - `Executor`: runs a plan in order, stopping at the first failure

pub mod action;
pub mod config;
pub mod error;
pub mod execute;
pub mod plan;
pub mod platform;
pub mod toolchain;
pub mod util;

pub use action::ReleaseAction;
pub use config::{ReleaseConfig, ReleaseManifest, Settings};
pub use error::{ConfigError, ReleaseError};
pub use execute::{ExecutionSummary, Executor, SystemRunner};
pub use plan::Step;
pub use platform::{Arch, Environment, Os, Target};
