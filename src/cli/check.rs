//! `check` command: plan without output and report warnings.

use anyhow::{Result, bail};

use super::plan::plan_site;
use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;

pub fn run_check(config: &SiteConfig, strict: bool) -> Result<()> {
    let instructions = plan_site(config)?;
    let warnings = instructions.iter().filter(|i| i.is_warning()).count();

    if warnings > 0 && strict {
        bail!("{} (--strict)", plural_count(warnings, "warning"));
    }
    log!("check"; "ok");
    Ok(())
}
