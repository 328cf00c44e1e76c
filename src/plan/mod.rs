//! Build plan emission and rendering.
//!
//! A [`BuildPlan`] is the contract handed to an external compiler/linker
//! driver: one [`BuildUnit`] per reachable module, in build order.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::descriptor::PchUsage;
use crate::propagate::ResolvedModule;

/// Compile and link instructions for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUnit {
    /// Module name.
    pub name: String,
    /// Include search paths, in order.
    pub effective_include_paths: Vec<String>,
    /// Modules to link against.
    pub effective_link_set: Vec<String>,
    /// Modules the built module loads at runtime.
    pub dynamic_load_set: Vec<String>,
    /// Precompiled-header policy.
    #[serde(default, skip_serializing_if = "PchUsage::is_default")]
    pub pch_usage: PchUsage,
}

impl From<ResolvedModule> for BuildUnit {
    fn from(module: ResolvedModule) -> Self {
        Self {
            name: module.name,
            effective_include_paths: module.effective_include_paths,
            effective_link_set: module.effective_link_set,
            dynamic_load_set: module.dynamic_load_set,
            pch_usage: module.pch_usage,
        }
    }
}

/// Ordered build units for one set of roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Requested roots, ascending.
    pub roots: Vec<String>,
    /// Units in build order: every unit follows its static dependencies.
    pub units: Vec<BuildUnit>,
}

impl BuildPlan {
    /// Looks up a unit by module name.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&BuildUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Position of a module in build order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.units.iter().position(|u| u.name == name)
    }

    /// Module names in build order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }
}

/// Emits a plan from modules already resolved in build order.
#[must_use]
pub fn emit(roots: Vec<String>, resolved: Vec<ResolvedModule>) -> BuildPlan {
    BuildPlan { roots, units: resolved.into_iter().map(BuildUnit::from).collect() }
}

/// Output format for a rendered plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Human-readable listing.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl std::str::FromStr for PlanFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| format!("unknown plan format: {s}"))
    }
}

/// Renders a plan in the requested format.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render(plan: &BuildPlan, format: PlanFormat) -> Result<String, String> {
    match format {
        PlanFormat::Text => Ok(render_text(plan)),
        PlanFormat::Json => serde_json::to_string_pretty(plan)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("failed to serialize plan as JSON: {e}")),
        PlanFormat::Yaml => {
            serde_yaml::to_string(plan).map_err(|e| format!("failed to serialize plan as YAML: {e}"))
        }
    }
}

fn render_text(plan: &BuildPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Build plan for: {}", plan.roots.join(", "));
    for (i, unit) in plan.units.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, unit.name);
        let _ = writeln!(out, "   includes: {}", join_or_dash(&unit.effective_include_paths));
        let _ = writeln!(out, "   links:    {}", join_or_dash(&unit.effective_link_set));
        let _ = writeln!(out, "   dynamic:  {}", join_or_dash(&unit.dynamic_load_set));
        if !unit.pch_usage.is_default() {
            let _ = writeln!(out, "   pch:      {}", unit.pch_usage);
        }
    }
    let _ = writeln!(out, "\n{} unit(s) total.", plan.units.len());
    out
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
