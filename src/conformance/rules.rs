//! The two `CTR-*` rules (§4.5). Both delegate to `ProjectContext`'s
//! precomputed findings and simply filter by the file under check.

use crate::model::{FileModel, Severity, Violation};
use crate::rules::{Rule, RuleCategory, RuleConfig, RuleMeta};

use super::ProjectContext;

pub struct CtrManifestConformance;

impl Rule for CtrManifestConformance {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CTR-manifest-conformance",
            category: RuleCategory::Ctr,
            description: "Code matches the manifest's declared contract shape",
            rationale: "A producer that silently drifts from its declared contract breaks every consumer without anyone noticing at review time.",
            default_severity: Severity::Error,
            needs_project_context: true,
            fixable: false,
        }
    }

    fn check(&self, file: &FileModel, project: Option<&ProjectContext>, _config: &RuleConfig) -> Vec<Violation> {
        match project {
            Some(project) => project.conformance_for(&file.path),
            None => Vec::new(),
        }
    }
}

pub struct CtrStrictnessParity;

impl Rule for CtrStrictnessParity {
    fn meta(&self) -> &RuleMeta {
        &RuleMeta {
            id: "CTR-strictness-parity",
            category: RuleCategory::Ctr,
            description: "A field's constraint is enforced symmetrically across producer and consumer",
            rationale: "Validation that exists on only one side of a contract is a latent bug the other side will eventually exercise.",
            default_severity: Severity::Error,
            needs_project_context: true,
            fixable: false,
        }
    }

    fn check(&self, file: &FileModel, project: Option<&ProjectContext>, _config: &RuleConfig) -> Vec<Violation> {
        match project {
            Some(project) => project.parity_for(&file.path),
            None => Vec::new(),
        }
    }
}
