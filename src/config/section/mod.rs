//! Configuration section definitions.
//!
//! | Section       | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | `[routes]`    | File naming conventions for classification     |
//! | `[bundles]`   | Bundle URIs and their bundler options          |
//! | `[redirects]` | Redirect source URIs and their target URLs     |

pub mod bundles;
pub mod routes;

pub use bundles::{BundleConfig, BundleRoutes, RedirectRoutes, validate_routes};
pub use routes::RoutesConfig;
