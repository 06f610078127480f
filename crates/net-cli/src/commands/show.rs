//! Show command: resolved attributes per interface

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use dpcfg_core::{
    AttributeResolver, Encapsulation, EncapsulationModel, Hierarchy, InterfaceKind, Resolved,
    ResolvedAddressSource, UnnumberedResolver,
};
use dpcfg_types::{AdminState, Config, ValidationPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct InterfaceSummary<'a> {
    pub name: &'a str,
    pub kind: Option<InterfaceKind>,
    pub mtu: Option<Resolved<'a, u32>>,
    pub admin_state: Option<AdminState>,
    pub mpls: Option<bool>,
    pub encapsulation: Option<Encapsulation>,
    pub unnumbered: Option<ResolvedAddressSource<'a>>,
}

/// Resolve every configured interface, in configuration order
pub fn summarize<'a>(config: &'a Config, policy: &ValidationPolicy) -> Vec<InterfaceSummary<'a>> {
    let hierarchy = Hierarchy::new(config);
    let attributes = AttributeResolver::new(&hierarchy, policy);
    let model = EncapsulationModel::new(&hierarchy, policy);
    let unnumbered = UnnumberedResolver::new(config);

    hierarchy
        .interfaces()
        .into_iter()
        .map(|name| InterfaceSummary {
            name,
            kind: hierarchy.classify(name),
            mtu: attributes.resolve_mtu(name),
            admin_state: attributes.effective_admin_state(name),
            mpls: attributes.resolve_mpls(name).map(|resolved| resolved.value),
            encapsulation: model.effective(name).ok(),
            unnumbered: unnumbered.resolve(name).ok(),
        })
        .collect()
}

fn describe<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn render(config: &Config, policy: &ValidationPolicy, format: OutputFormat) -> Result<String> {
    let summaries = summarize(config, policy);
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&summaries).context("Failed to serialize summary")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for summary in &summaries {
                let mtu = match &summary.mtu {
                    Some(resolved) => format!("{} ({})", resolved.value, resolved.source),
                    None => "-".to_string(),
                };
                writeln!(
                    out,
                    "{} kind={} mtu={} state={} mpls={} encap={} unnumbered={}",
                    summary.name,
                    describe(summary.kind),
                    mtu,
                    describe(summary.admin_state),
                    describe(summary.mpls),
                    describe(summary.encapsulation),
                    describe(summary.unnumbered.as_ref().map(|source| source.name)),
                )?;
            }
            Ok(out)
        }
    }
}

/// Show command implementation
pub struct ShowCommand {
    policy: ValidationPolicy,
}

impl ShowCommand {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub async fn execute(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let config = dpcfg_config::load_file(path)
            .with_context(|| format!("Failed to load configuration file: {}", path.display()))?;
        print!("{}", render(&config, &self.policy, format)?);
        Ok(())
    }
}
