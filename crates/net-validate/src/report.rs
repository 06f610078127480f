//! Accumulated validation results

use serde::Serialize;

use dpcfg_core::UnnumberedError;

/// Why an unnumbered chain could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedReason {
    Dangling,
    Cycle,
    NoAddress,
}

impl From<&UnnumberedError> for UnresolvedReason {
    fn from(err: &UnnumberedError) -> Self {
        match err {
            UnnumberedError::DanglingReference { .. } | UnnumberedError::NotUnnumbered { .. } => {
                UnresolvedReason::Dangling
            }
            UnnumberedError::CycleDetected { .. } => UnresolvedReason::Cycle,
            UnnumberedError::NoAddressAvailable { .. } => UnresolvedReason::NoAddress,
        }
    }
}

/// Category of a rule violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A referenced parent or target is not in the configuration
    SchemaAssumptionViolated,
    MalformedName,
    EncapsulationMalformed,
    EncapsulationCollision,
    MtuExceedsParent,
    LcpNameCollision,
    LcpInvalidName,
    /// LCP placed where the dataplane cannot expose it
    LcpRequirement,
    MissingLcp,
    L2xcInconsistent,
    L2xcMember,
    UnnumberedUnresolvable(UnresolvedReason),
    UnnumberedConflict,
    LoopbackMissingLcp,
    LoopbackInvalid,
    AddressInvalid,
    AddressConflict,
    /// Raised by a caller-supplied rule
    Custom,
}

/// One violated rule instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Offending interface or loopback
    pub subject: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: ViolationKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let violation = Violation {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        log::debug!("{:?}: {}", violation.kind, violation.message);
        self.violations.push(violation);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Violations naming `subject`, in report order
    pub fn for_subject<'r>(&'r self, subject: &'r str) -> impl Iterator<Item = &'r Violation> {
        self.violations.iter().filter(move |v| v.subject == subject)
    }

    /// The `(overall_pass, diagnostics)` pair handed to the apply stage
    pub fn into_result(self) -> (bool, Vec<String>) {
        let pass = self.is_valid();
        let diagnostics = self.violations.into_iter().map(|v| v.message).collect();
        (pass, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_accumulates() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.push(ViolationKind::MissingLcp, "xe0", "Interface xe0 has an address but no LCP");
        report.push(
            ViolationKind::UnnumberedUnresolvable(UnresolvedReason::Cycle),
            "xe1",
            "Interface xe1 unnumbered chain xe1 -> xe2 -> xe1 loops back on itself",
        );

        assert!(!report.is_valid());
        assert_eq!(report.count(ViolationKind::MissingLcp), 1);
        assert_eq!(report.for_subject("xe1").count(), 1);

        let (pass, diagnostics) = report.into_result();
        assert!(!pass);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].contains("xe0"));
    }

    #[test]
    fn test_unresolved_reason_from_error() {
        let err = UnnumberedError::NoAddressAvailable {
            name: "xe0".to_string(),
            target: "xe1".to_string(),
        };
        assert_eq!(UnresolvedReason::from(&err), UnresolvedReason::NoAddress);
    }
}
