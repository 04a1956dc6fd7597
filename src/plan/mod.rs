//! Build instruction planning.
//!
//! Pipeline: bundles -> redirects -> tree walk -> output conflicts
//!
//! The walk is post-order: a directory's subdirectories are planned before
//! its own index route, and its own index route before its files.
//!
//! # Failures
//!
//! | Condition                                   | Outcome          |
//! |---------------------------------------------|------------------|
//! | configured URI classifies as something else | fatal            |
//! | malformed index script                      | fatal            |
//! | unreadable directory                        | fatal            |
//! | ambiguous directory index                   | warning          |
//! | broken symlink                              | warning          |
//! | absent path                                 | no instruction   |

mod conflict;
mod instruction;
mod script;

#[cfg(test)]
mod tests;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::SiteConfig;
use crate::core::{INDEX_HTML, directory_uri, display_uri, uri_to_file_path, uri_to_relative_path};
use crate::debug;
use crate::router::{MissingReason, OsTree, Route, Router};

pub use conflict::detect_output_conflicts;
pub use instruction::{BuildInstruction, TemplateVariables};
pub use script::{ManifestLoader, RouteDescriptor, RouteLoader, RouteTable, ScriptError, parse_manifest};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("`{uri}` is configured as {expected} but classifies as {actual}")]
    ConfigMismatch {
        uri: String,
        expected: &'static str,
        actual: String,
    },

    #[error("invalid index script `{}`", path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: ScriptError,
    },

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Plan the whole site on the real filesystem.
pub fn build_instructions(config: &SiteConfig) -> Result<Vec<BuildInstruction>, PlanError> {
    Planner::new(Router::new(config, &OsTree), &ManifestLoader).plan()
}

pub struct Planner<'a> {
    router: Router<'a>,
    loader: &'a dyn RouteLoader,
}

impl<'a> Planner<'a> {
    pub fn new(router: Router<'a>, loader: &'a dyn RouteLoader) -> Self {
        Self { router, loader }
    }

    pub fn router(&self) -> &Router<'a> {
        &self.router
    }

    /// Produce the full instruction list, or nothing at all on a fatal error.
    pub fn plan(&self) -> Result<Vec<BuildInstruction>, PlanError> {
        let mut instructions = self.bundle_instructions()?;
        instructions.extend(self.redirect_instructions()?);
        instructions.extend(self.plan_directory(Path::new(""))?);

        let conflicts = detect_output_conflicts(&instructions);
        instructions.extend(conflicts);
        Ok(instructions)
    }

    fn config(&self) -> &'a SiteConfig {
        self.router.config()
    }

    fn bundle_instructions(&self) -> Result<Vec<BuildInstruction>, PlanError> {
        let mut instructions = Vec::new();
        for (uri, bundle) in &self.config().bundles {
            self.expect_route(
                uri,
                &Route::Esbuild {
                    config: bundle.clone(),
                },
            )?;
            instructions.push(BuildInstruction::Esbuild {
                bundle_path: uri_to_file_path(uri),
                esbuild_config: bundle.clone(),
            });
        }
        Ok(instructions)
    }

    /// Targets are passed through verbatim.
    fn redirect_instructions(&self) -> Result<Vec<BuildInstruction>, PlanError> {
        let mut instructions = Vec::new();
        for (from, to) in &self.config().redirects {
            self.expect_route(from, &Route::Redirect { target: to.clone() })?;
            instructions.push(BuildInstruction::HtmlRedirect {
                html_path: uri_to_file_path(from),
                redirect_target_url: to.clone(),
            });
        }
        Ok(instructions)
    }

    /// A configured URI must classify back to its configured route.
    fn expect_route(&self, uri: &str, expected: &Route) -> Result<(), PlanError> {
        let actual = self
            .router
            .classify_file_route(uri)
            .map_err(|source| PlanError::Io {
                path: self.config().root_join(uri_to_file_path(uri)),
                source,
            })?;
        if &actual == expected {
            Ok(())
        } else {
            Err(PlanError::ConfigMismatch {
                uri: uri.to_string(),
                expected: expected.kind(),
                actual: actual.to_string(),
            })
        }
    }

    /// Instructions for one directory subtree, descendants first.
    pub fn plan_directory(&self, relative: &Path) -> Result<Vec<BuildInstruction>, PlanError> {
        let path = self.config().root_join(relative);
        let entries = self
            .router
            .tree()
            .list_directory(&path)
            .map_err(|source| PlanError::Io { path, source })?;
        let routes = &self.config().routes;

        let mut instructions = Vec::new();
        for entry in entries.iter().filter(|e| e.is_directory()) {
            if routes.is_hidden_name(&entry.name.to_string_lossy()) {
                debug!("walk"; "skip hidden {}", display_uri(&relative.join(&entry.name)));
                continue;
            }
            instructions.extend(self.plan_directory(&relative.join(&entry.name))?);
        }

        let directory = self.classify(relative, true)?;
        instructions.extend(self.route_instructions(directory, relative, relative)?);

        for entry in entries.iter().filter(|e| !e.is_directory()) {
            let file = relative.join(&entry.name);
            let route = self.classify(&file, false)?;
            instructions.extend(self.route_instructions(route, relative, &file)?);
        }

        Ok(instructions)
    }

    fn classify(&self, relative: &Path, directory: bool) -> Result<Route, PlanError> {
        let result = if directory {
            self.router.classify_directory(relative)
        } else {
            self.router.classify_file(relative)
        };
        result.map_err(|source| PlanError::Io {
            path: self.config().root_join(relative),
            source,
        })
    }

    /// Translate one classification into instructions.
    fn route_instructions(
        &self,
        route: Route,
        directory: &Path,
        relative: &Path,
    ) -> Result<Vec<BuildInstruction>, PlanError> {
        let routes = &self.config().routes;
        let instructions = match route {
            Route::Ambiguous => vec![BuildInstruction::warning(format!(
                "{} has both {} and {}; using neither",
                directory_uri(directory),
                routes.template_index,
                routes.static_index,
            ))],
            Route::BuildTemplate { path } => vec![BuildInstruction::build_template(
                path,
                directory.join(INDEX_HTML),
                directory_uri(directory),
            )],
            Route::Copy { path } => vec![BuildInstruction::Copy { path }],
            Route::Static | Route::Forbidden => vec![BuildInstruction::Copy {
                path: relative.to_path_buf(),
            }],
            Route::Missing {
                why: MissingReason::BrokenSymlink,
            } => vec![BuildInstruction::warning(format!(
                "{} is a broken symlink; ignoring",
                display_uri(relative)
            ))],
            Route::Missing { why } => {
                debug!("walk"; "skip {} ({})", display_uri(relative), why.as_str());
                vec![]
            }
            Route::IndexScript => self.virtual_route_instructions(directory, relative)?,
            // Emitted from configuration before the walk
            Route::Esbuild { .. } | Route::Redirect { .. } => vec![],
            Route::DoesNotExist => vec![],
        };
        Ok(instructions)
    }

    fn virtual_route_instructions(
        &self,
        directory: &Path,
        script: &Path,
    ) -> Result<Vec<BuildInstruction>, PlanError> {
        let path = self.config().root_join(script);
        let table = self
            .loader
            .load_routes(&path)
            .map_err(|source| PlanError::Script { path, source })?;
        debug!("walk"; "{} declares {} routes", display_uri(script), table.len());

        let instructions = table
            .into_iter()
            .map(|(uri, descriptor)| match descriptor {
                RouteDescriptor::BuildTemplate { path } => BuildInstruction::build_template(
                    directory.join(path),
                    uri_to_relative_path(&uri).join(INDEX_HTML),
                    uri,
                ),
            })
            .collect();
        Ok(instructions)
    }
}
