//! Build instructions consumed by the external executor.
//!
//! Serialized as internally tagged JSON:
//!
//! ```json
//! {"type": "copy", "path": "logo.png"}
//! {"type": "build-template", "sourcePath": "index.ejs.html",
//!  "destinationPath": "index.html", "templateVariables": {"currentURI": "/"}}
//! {"type": "esbuild", "bundlePath": "main.bundled.js", "esbuildConfig": {...}}
//! {"type": "html-redirect", "htmlPath": "old.html", "redirectTargetURL": "/new/"}
//! {"type": "warning", "message": "..."}
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::BundleConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BuildInstruction {
    Copy {
        path: PathBuf,
    },
    #[serde(rename_all = "camelCase")]
    BuildTemplate {
        source_path: PathBuf,
        destination_path: PathBuf,
        template_variables: TemplateVariables,
    },
    #[serde(rename_all = "camelCase")]
    Esbuild {
        bundle_path: PathBuf,
        esbuild_config: BundleConfig,
    },
    #[serde(rename_all = "camelCase")]
    HtmlRedirect {
        html_path: PathBuf,
        #[serde(rename = "redirectTargetURL")]
        redirect_target_url: String,
    },
    Warning {
        message: String,
    },
}

/// Variables handed to the template renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariables {
    /// Canonical absolute URI of the page being rendered.
    #[serde(rename = "currentURI")]
    pub current_uri: String,
}

impl BuildInstruction {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn build_template(source: PathBuf, destination: PathBuf, uri: impl Into<String>) -> Self {
        Self::BuildTemplate {
            source_path: source,
            destination_path: destination,
            template_variables: TemplateVariables {
                current_uri: uri.into(),
            },
        }
    }

    /// Stable kebab-case name, matching the serialized `type` tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Copy { .. } => "copy",
            Self::BuildTemplate { .. } => "build-template",
            Self::Esbuild { .. } => "esbuild",
            Self::HtmlRedirect { .. } => "html-redirect",
            Self::Warning { .. } => "warning",
        }
    }

    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }

    /// Output path (relative to the output root) this instruction writes.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Copy { path } => Some(path),
            Self::BuildTemplate {
                destination_path, ..
            } => Some(destination_path),
            Self::Esbuild { bundle_path, .. } => Some(bundle_path),
            Self::HtmlRedirect { html_path, .. } => Some(html_path),
            Self::Warning { .. } => None,
        }
    }
}
