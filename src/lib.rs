//! # Sentry Release Action
//!
//! Records a software release in Sentry from a CI pipeline step.
//!
//! A run validates every option up front, then drives the `sentry-cli`
//! executable through a fixed sequence: create the release, associate commits,
//! inject debug ids and upload sourcemaps (one upload per project, issued
//! concurrently), register a deploy, and finalize.
//!
//! ## Usage
//!
//! ```bash
//! export SENTRY_ORG=my-org SENTRY_AUTH_TOKEN=... SENTRY_PROJECT=web
//! sentry-release-action --environment production --sourcemaps ./dist
//! MOCK=1 sentry-release-action        # echo commands instead of running them
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod client;
pub mod env;
pub mod error;
pub mod options;
pub mod telemetry;

pub use client::{ReleaseApi, ReleaseHandle};
pub use env::EnvConfig;
pub use error::{ReleaseError, Result};
pub use options::RunConfig;
