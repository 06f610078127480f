//! dpcfg validation
//!
//! Semantic consistency rules over a parsed dataplane configuration. Every rule sees
//! the same read-only [`ValidationContext`] and appends to a shared report; no rule
//! depends on the output of another.

pub mod address;
pub mod interface;
pub mod l2xc;
pub mod lcp;
pub mod loopback;
pub mod report;
pub mod unnumbered;

pub use address::AddressRule;
pub use interface::InterfaceRule;
pub use l2xc::L2xcRule;
pub use lcp::LcpRule;
pub use loopback::LoopbackRule;
pub use report::{UnresolvedReason, ValidationReport, Violation, ViolationKind};
pub use unnumbered::UnnumberedRule;

use dpcfg_core::{AttributeResolver, EncapsulationModel, Hierarchy, Registry, UnnumberedResolver};
use dpcfg_types::{Config, ValidationPolicy};

/// Shared state for one validation run. Built once, then discarded with the run.
pub struct ValidationContext<'a> {
    pub config: &'a Config,
    pub policy: &'a ValidationPolicy,
    pub hierarchy: Hierarchy<'a>,
    pub registry: Registry<'a>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(config: &'a Config, policy: &'a ValidationPolicy) -> Self {
        Self {
            config,
            policy,
            hierarchy: Hierarchy::new(config),
            registry: Registry::build(config),
        }
    }

    pub fn attributes(&self) -> AttributeResolver<'_, 'a> {
        AttributeResolver::new(&self.hierarchy, self.policy)
    }

    pub fn encapsulation(&self) -> EncapsulationModel<'_, 'a> {
        EncapsulationModel::new(&self.hierarchy, self.policy)
    }

    pub fn unnumbered(&self) -> UnnumberedResolver<'a> {
        UnnumberedResolver::new(self.config)
    }
}

/// A single consistency rule
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    /// Append one violation per offending instance; never stop at the first.
    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport);
}

/// Runs the built-in rules, then any registered ones, in order
pub struct Validator {
    policy: ValidationPolicy,
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_policy(ValidationPolicy::default())
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            rules: vec![
                Box::new(InterfaceRule::new()),
                Box::new(LcpRule::new()),
                Box::new(L2xcRule::new()),
                Box::new(UnnumberedRule::new()),
                Box::new(LoopbackRule::new()),
                Box::new(AddressRule::new()),
            ],
        }
    }

    /// Register an additional rule; it runs after everything already registered.
    pub fn add_rule<R: Rule + 'static>(&mut self, rule: R) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn validate_report(&self, config: &Config) -> ValidationReport {
        let ctx = ValidationContext::new(config, &self.policy);
        let mut report = ValidationReport::new();
        for rule in &self.rules {
            log::debug!("running rule {}", rule.name());
            rule.check(&ctx, &mut report);
        }
        report
    }

    /// Overall verdict and one diagnostic per violated rule instance
    pub fn validate(&self, config: &Config) -> (bool, Vec<String>) {
        self.validate_report(config).into_result()
    }

    /// Validate and log every diagnostic at error level
    pub fn valid_config(&self, config: &Config) -> bool {
        let (pass, diagnostics) = self.validate(config);
        for diagnostic in &diagnostics {
            log::error!("{}", diagnostic);
        }
        if pass {
            log::info!("configuration is semantically valid");
        } else {
            log::warn!("configuration has {} semantic errors", diagnostics.len());
        }
        pass
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
