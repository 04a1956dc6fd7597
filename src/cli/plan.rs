//! `plan` command: emit the instruction list as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::log;
use crate::plan::{BuildInstruction, build_instructions};
use crate::utils::plural_count;

/// Instruction counts per kind, for the closing log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub copy: usize,
    pub build_template: usize,
    pub esbuild: usize,
    pub html_redirect: usize,
    pub warning: usize,
}

impl PlanSummary {
    pub fn from_instructions(instructions: &[BuildInstruction]) -> Self {
        let mut summary = Self::default();
        for instruction in instructions {
            let counter = match instruction {
                BuildInstruction::Copy { .. } => &mut summary.copy,
                BuildInstruction::BuildTemplate { .. } => &mut summary.build_template,
                BuildInstruction::Esbuild { .. } => &mut summary.esbuild,
                BuildInstruction::HtmlRedirect { .. } => &mut summary.html_redirect,
                BuildInstruction::Warning { .. } => &mut summary.warning,
            };
            *counter += 1;
        }
        summary
    }
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            plural_count(self.copy, "file"),
            plural_count(self.build_template, "template"),
            plural_count(self.esbuild, "bundle"),
            plural_count(self.html_redirect, "redirect"),
            plural_count(self.warning, "warning"),
        )
    }
}

/// Plan the site and log every warning. Fatal errors carry the site root.
pub fn plan_site(config: &SiteConfig) -> Result<Vec<BuildInstruction>> {
    let instructions = build_instructions(config)
        .with_context(|| format!("planning `{}` failed", config.get_root().display()))?;

    for instruction in &instructions {
        if let BuildInstruction::Warning { message } = instruction {
            log!("warning"; "{}", message);
        }
    }
    log!("plan"; "{}", PlanSummary::from_instructions(&instructions));
    Ok(instructions)
}

pub fn run_plan(config: &SiteConfig, output: Option<&Path>, pretty: bool) -> Result<()> {
    let instructions = plan_site(config)?;
    let json = if pretty {
        serde_json::to_string_pretty(&instructions)?
    } else {
        serde_json::to_string(&instructions)?
    };

    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("plan"; "wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_summary_counts() {
        let instructions = vec![
            BuildInstruction::Copy {
                path: PathBuf::from("a"),
            },
            BuildInstruction::Copy {
                path: PathBuf::from("b"),
            },
            BuildInstruction::warning("w"),
        ];
        let summary = PlanSummary::from_instructions(&instructions);
        assert_eq!(summary.copy, 2);
        assert_eq!(summary.warning, 1);
        assert_eq!(
            summary.to_string(),
            "2 files, 0 templates, 0 bundles, 0 redirects, 1 warning"
        );
    }

    #[test]
    fn test_run_plan_writes_json() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("www");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("robots.txt"), "").unwrap();
        let output = dir.path().join("plan.json");

        let config = SiteConfig::new(&root).with_redirect("/old.html", "/new/");
        run_plan(&config, Some(&output), false).unwrap();

        let written: Vec<BuildInstruction> =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, build_instructions(&config).unwrap());
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn test_plan_site_error_has_context() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::new(dir.path().join("missing"));
        let err = plan_site(&config).unwrap_err();
        assert!(err.to_string().contains("planning"));
    }
}
