//! routeplan - plan the static build of a website source tree.
//!
//! Classifies every path under a site root and emits a declarative list of
//! build instructions (copy, template render, bundle, redirect, warning) for a
//! separate executor to perform.
//!
//! | Module     | Purpose                                               |
//! |------------|-------------------------------------------------------|
//! | [`router`] | Classifier: what produces the content of one path     |
//! | [`plan`]   | Planner: post-order walk producing the instruction list|
//! | [`config`] | `routeplan.toml` loading and validation               |
//! | [`core`]   | URI <-> relative path mapping                         |
//! | [`cli`]    | Command-line interface                                |
//!
//! # Example
//!
//! ```no_run
//! use routeplan::config::{BundleConfig, SiteConfig};
//! use routeplan::plan::build_instructions;
//!
//! let config = SiteConfig::new("www")
//!     .with_bundle("/main.bundled.js", BundleConfig::new(["main.js"]))
//!     .with_redirect("/old.html", "/new/");
//! let instructions = build_instructions(&config)?;
//! # Ok::<(), routeplan::plan::PlanError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod plan;
pub mod router;
pub mod utils;
