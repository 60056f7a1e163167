//! Plan file: overrides for the post-pass table and the child environment.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use demorun_core::environment::RunEnvironment;
use demorun_core::launch::LaunchSpec;
use demorun_core::options::RunOptions;

/// Contents of a `--plan` JSON file. Absent keys keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Replaces the built-in post-pass table.
    #[serde(default)]
    pub post_pass: Option<Vec<LaunchSpec>>,
    /// Merged over the default child environment.
    #[serde(default)]
    pub env: Option<RunEnvironment>,
}

impl Plan {
    /// Apply the overrides to `options`.
    pub fn apply(self, options: &mut RunOptions) {
        if let Some(post_pass) = self.post_pass {
            options.post_pass = post_pass;
        }
        if let Some(env) = self.env {
            for (key, value) in env.iter() {
                options.env.set(key, value);
            }
        }
    }
}

/// Read and parse a plan file.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan {}", path.display()))?;
    let plan: Plan = serde_json::from_str(&content)
        .with_context(|| format!("parsing plan {}", path.display()))?;
    tracing::debug!(plan = %path.display(), "loaded plan");
    Ok(plan)
}
