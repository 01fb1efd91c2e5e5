//! Strictness-parity & conformance rules (C5, §4.5).
//!
//! Both rule families need cross-file visibility (whether *any* file in a
//! role's `handler_paths`/`type_paths` enforces or declares something, or
//! whether *any* handler matches a declared endpoint) that a single
//! `FileModel` cannot answer by itself. `ProjectContext::build` therefore
//! does the cross-file aggregation once, up front; the per-file
//! `Rule::check` calls required by the registry's uniform `(FileModel,
//! ProjectContext?, RuleConfig)` contract (§4.2) then just filter the
//! precomputed findings down to the file currently being visited, so each
//! finding is still attributed to exactly one file and never emitted twice.

mod rules;

pub use rules::{CtrManifestConformance, CtrStrictnessParity};

use std::collections::HashSet;

use glob::Pattern;

use crate::adapters::handlers::normalize_path;
use crate::manifest::{Contract, Field, FieldType, Manifest, ServiceRole};
use crate::model::{
    DataShape, EvidenceKind, EvidenceValue, FileModel, HandlerBinding, Severity, ValidationEvidence,
    Violation,
};

/// This service's declared participation in one contract (`.stricture.yml`
/// `manifest.contracts[]`, §6).
#[derive(Debug, Clone)]
pub struct ContractBinding {
    pub contract_id: String,
    pub role: ServiceRole,
    pub handler_paths: Vec<String>,
    pub type_paths: Vec<String>,
    pub enum_strict_subset: bool,
}

/// Aggregated project-wide state C5 rules consult: the loaded manifest,
/// this service's contract bindings, and findings precomputed over the
/// full file set (§4.5).
pub struct ProjectContext {
    pub manifest: Manifest,
    pub service_id: String,
    pub bindings: Vec<ContractBinding>,
    conformance_violations: Vec<Violation>,
    parity_violations: Vec<Violation>,
}

impl ProjectContext {
    pub fn build(
        manifest: Manifest,
        service_id: String,
        bindings: Vec<ContractBinding>,
        files: &[FileModel],
    ) -> Self {
        let conformance_violations = compute_conformance(&manifest, &bindings, files);
        let parity_violations = compute_parity(&manifest, &bindings, files);
        Self {
            manifest,
            service_id,
            bindings,
            conformance_violations,
            parity_violations,
        }
    }

    /// Register the `CTR-*` rules into `registry`. Called by the engine
    /// once a manifest has been loaded and bindings resolved; a run with no
    /// manifest never calls this, and `Registry::select` would exclude the
    /// rules anyway via `needs_project_context`.
    pub fn register(registry: &mut crate::rules::Registry) {
        registry.register(Box::new(CtrManifestConformance));
        registry.register(Box::new(CtrStrictnessParity));
    }

    fn conformance_for(&self, path: &str) -> Vec<Violation> {
        self.conformance_violations.iter().filter(|v| v.file_path == path).cloned().collect()
    }

    fn parity_for(&self, path: &str) -> Vec<Violation> {
        self.parity_violations.iter().filter(|v| v.file_path == path).cloned().collect()
    }
}

fn files_matching<'a>(files: &'a [FileModel], globs: &[String]) -> Vec<&'a FileModel> {
    let patterns: Vec<Pattern> = globs.iter().filter_map(|g| Pattern::new(g).ok()).collect();
    files.iter().filter(|f| patterns.iter().any(|p| p.matches(&f.path))).collect()
}

fn all_handlers<'a>(files: &[&'a FileModel]) -> Vec<&'a HandlerBinding> {
    files.iter().flat_map(|f| f.handlers.iter()).collect()
}

fn all_evidence<'a>(files: &[&'a FileModel]) -> Vec<&'a ValidationEvidence> {
    files.iter().flat_map(|f| f.validation_evidence.iter()).collect()
}

fn all_shapes<'a>(files: &[&'a FileModel]) -> Vec<&'a DataShape> {
    files.iter().flat_map(|f| f.shapes.iter()).collect()
}

/// A representative file to anchor a project-wide finding on: the first
/// (by path) file in the role's `handler_paths`, falling back to the first
/// file in the run so that a finding is never silently dropped for want of
/// an anchor.
fn anchor_file<'a>(files: &[&'a FileModel], all_files: &'a [FileModel]) -> Option<&'a str> {
    files
        .iter()
        .map(|f| f.path.as_str())
        .min()
        .or_else(|| all_files.first().map(|f| f.path.as_str()))
}

fn compute_conformance(manifest: &Manifest, bindings: &[ContractBinding], files: &[FileModel]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for binding in bindings {
        let Some(contract) = manifest.contracts.iter().find(|c| c.id == binding.contract_id) else {
            continue;
        };

        if matches!(binding.role, ServiceRole::Producer | ServiceRole::Both) {
            check_handler_coverage(contract, binding, files, &mut violations);
            check_status_codes(contract, binding, files, &mut violations);
        }

        check_field_conformance(contract, binding, files, &mut violations);
    }

    violations
}

/// §4.5 check 5: every declared endpoint has a matching handler registration
/// somewhere under this binding's `handler_paths`.
fn check_handler_coverage(
    contract: &Contract,
    binding: &ContractBinding,
    files: &[FileModel],
    violations: &mut Vec<Violation>,
) {
    let handler_files = files_matching(files, &binding.handler_paths);
    let handlers = all_handlers(&handler_files);
    let Some(anchor) = anchor_file(&handler_files, files) else {
        return;
    };

    for endpoint in &contract.endpoints {
        let declared_path = normalize_path(&endpoint.path);
        let covered = handlers.iter().any(|h| {
            (h.method == endpoint.method.to_string() || h.method == "ANY") && normalize_path(&h.path) == declared_path
        });
        if !covered {
            violations.push(Violation::new(
                "CTR-manifest-conformance",
                Severity::Error,
                format!(
                    "contract '{}' declares endpoint {} {} with no matching handler under {:?}",
                    contract.id, endpoint.method, endpoint.path, binding.handler_paths
                ),
                anchor,
                1,
            ));
        }
    }
}

/// §4.5 check 6: "code does not emit status codes outside the declared
/// set". Only evidence sites where the literal code was actually captured
/// (not a named constant) can be compared.
fn check_status_codes(
    contract: &Contract,
    binding: &ContractBinding,
    files: &[FileModel],
    violations: &mut Vec<Violation>,
) {
    let handler_files = files_matching(files, &binding.handler_paths);
    let Some(anchor) = anchor_file(&handler_files, files) else {
        return;
    };

    let declared: HashSet<u16> = contract.endpoints.iter().flat_map(|e| e.status_codes.iter().copied()).collect();
    if declared.is_empty() {
        return;
    }

    let mut emitted: Vec<u16> = all_evidence(&handler_files)
        .iter()
        .filter(|e| e.kind == EvidenceKind::StatusCodes)
        .filter_map(|e| match &e.value {
            Some(EvidenceValue::Code(code)) => Some(*code),
            _ => None,
        })
        .collect();
    emitted.sort_unstable();
    emitted.dedup();

    for code in emitted {
        if !declared.contains(&code) {
            violations.push(Violation::new(
                "CTR-manifest-conformance",
                Severity::Error,
                format!(
                    "contract '{}' emits status code {code}, which is not in its declared status_codes {:?}",
                    contract.id,
                    {
                        let mut sorted: Vec<u16> = declared.iter().copied().collect();
                        sorted.sort_unstable();
                        sorted
                    }
                ),
                anchor,
                1,
            ));
        }
    }
}

/// §4.5 checks 1-4: field presence (by name or serialization tag),
/// language-type to manifest-type mapping (§6), required-ness parity, and
/// enum superset handling. Degrades silently when this binding has no
/// `type_paths`, or none of those files yielded an extracted data shape —
/// there is nothing typed to compare the manifest against.
fn check_field_conformance(
    contract: &Contract,
    binding: &ContractBinding,
    files: &[FileModel],
    violations: &mut Vec<Violation>,
) {
    if binding.type_paths.is_empty() {
        return;
    }
    let type_files = files_matching(files, &binding.type_paths);
    let Some(anchor) = anchor_file(&type_files, files) else {
        return;
    };
    let shapes = all_shapes(&type_files);
    if shapes.is_empty() {
        return;
    }
    let evidence = all_evidence(&type_files);

    let mut fields: Vec<&Field> = Vec::new();
    for endpoint in &contract.endpoints {
        fields.extend(endpoint.request.iter().flatten());
        fields.extend(endpoint.response.iter().flatten());
    }
    for event in &contract.messages {
        fields.extend(event.fields.iter());
    }

    for field in fields {
        let matched = shapes
            .iter()
            .find_map(|shape| shape.fields.iter().find(|sf| field_identifies(sf, &field.name)));

        let Some(shape_field) = matched else {
            violations.push(Violation::new(
                "CTR-manifest-conformance",
                Severity::Error,
                format!(
                    "field '{}' declared in contract '{}' has no matching field in any type under {:?}",
                    field.name, contract.id, binding.type_paths
                ),
                anchor,
                1,
            ));
            continue;
        };

        if !type_maps(&shape_field.type_name, field.field_type) {
            violations.push(Violation::new(
                "CTR-manifest-conformance",
                Severity::Error,
                format!(
                    "field '{}' has code type '{}' which does not map to manifest type '{}' (contract '{}')",
                    field.name,
                    shape_field.type_name.trim(),
                    field.field_type,
                    contract.id
                ),
                anchor,
                1,
            ));
        }

        if field.required && !shape_field.required {
            violations.push(Violation::new(
                "CTR-manifest-conformance",
                Severity::Error,
                format!(
                    "field '{}' is optional in code but required in the manifest (contract '{}')",
                    field.name, contract.id
                ),
                anchor,
                1,
            ));
        }

        if field.field_type == FieldType::Enum {
            check_enum_superset(field, binding, &shapes, &evidence, contract, anchor, violations);
        }
    }
}

fn field_identifies(shape_field: &crate::model::ShapeField, field_name: &str) -> bool {
    shape_field.name == field_name || shape_field.tag_name.as_deref() == Some(field_name)
}

fn check_enum_superset(
    field: &Field,
    binding: &ContractBinding,
    shapes: &[&DataShape],
    evidence: &[&ValidationEvidence],
    contract: &Contract,
    anchor: &str,
    violations: &mut Vec<Violation>,
) {
    let Some(manifest_values) = &field.values else {
        return;
    };
    let Some(code_values) = code_enum_values(&field.name, shapes, evidence) else {
        return;
    };

    for v in &code_values {
        if !manifest_values.contains(v) {
            violations.push(Violation::new(
                "CTR-manifest-conformance",
                Severity::Error,
                format!(
                    "field '{}' code enum value '{v}' is not declared in the manifest enum (contract '{}')",
                    field.name, contract.id
                ),
                anchor,
                1,
            ));
        }
    }

    if binding.enum_strict_subset {
        for v in manifest_values {
            if !code_values.contains(v) {
                violations.push(Violation::new(
                    "CTR-manifest-conformance",
                    Severity::Error,
                    format!(
                        "field '{}' manifest enum value '{v}' is not implemented in code (contract '{}', enum_strict_subset)",
                        field.name, contract.id
                    ),
                    anchor,
                    1,
                ));
            }
        }
    }
}

/// Union the code-detected enum values for `field_name`: TS union-of-string-
/// literal type declarations, plus `Enum`-kind `ValidationEvidence` values
/// (Go `oneof=`/switch scanning). `None` means nothing was detected at all,
/// so there's no basis for a superset comparison either way.
fn code_enum_values(field_name: &str, shapes: &[&DataShape], evidence: &[&ValidationEvidence]) -> Option<Vec<String>> {
    let mut values: Vec<String> = Vec::new();

    for shape in shapes {
        for sf in &shape.fields {
            if field_identifies(sf, field_name) {
                if let Some(literal_values) = union_literal_values(&sf.type_name) {
                    values.extend(literal_values);
                }
            }
        }
    }
    for e in evidence {
        if e.field_name == field_name && e.kind == EvidenceKind::Enum {
            if let Some(EvidenceValue::Values(vs)) = &e.value {
                values.extend(vs.iter().cloned());
            }
        }
    }

    if values.is_empty() {
        return None;
    }
    values.sort();
    values.dedup();
    Some(values)
}

/// Parse a TypeScript union-of-string-literals type, e.g. `'a' | 'b'`, into
/// its literal values. Returns `None` for anything else (not an enum-shaped
/// type, or one this heuristic can't read).
fn union_literal_values(type_name: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = type_name.split('|').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }
    let mut values = Vec::with_capacity(parts.len());
    for part in parts {
        let quoted = (part.starts_with('\'') && part.ends_with('\'') && part.len() >= 2)
            || (part.starts_with('"') && part.ends_with('"') && part.len() >= 2);
        if !quoted {
            return None;
        }
        values.push(part[1..part.len() - 1].to_string());
    }
    Some(values)
}

/// §6 type-mapping table: does `code_type` (raw TS/Go type text) map onto
/// `manifest_type`? TypeScript `number` is permissive both ways (integer or
/// number); everything else is a fixed table entry.
fn type_maps(code_type: &str, manifest_type: FieldType) -> bool {
    let t = code_type.trim();

    if union_literal_values(t).is_some() {
        return matches!(manifest_type, FieldType::Enum | FieldType::String);
    }
    if t.ends_with("[]") || t.starts_with('[') || t.starts_with("Array<") {
        return matches!(manifest_type, FieldType::Array);
    }

    let base = t.trim_start_matches('*');
    match base {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32" | "uint64"
        | "bigint" => matches!(manifest_type, FieldType::Integer),
        "float32" | "float64" => matches!(manifest_type, FieldType::Number),
        "number" => matches!(manifest_type, FieldType::Integer | FieldType::Number),
        "string" => matches!(manifest_type, FieldType::String | FieldType::Enum),
        "bool" | "boolean" => matches!(manifest_type, FieldType::Boolean),
        other => {
            if other.starts_with('{') || other.starts_with("map[") || other == "object" || other.starts_with("Record<")
            {
                matches!(manifest_type, FieldType::Object)
            } else {
                // An unrecognized named type (custom struct, interface, or
                // type alias) is assumed to be an object.
                matches!(manifest_type, FieldType::Object)
            }
        }
    }
}

/// Declared constraint categories on a field, used to decide which
/// `EvidenceKind`s count as "this field's constraint enforced" (§4.5:
/// parity is at the level of constraint *kind* first, then diffed further
/// by bound/value set when both sides enforce the same kind).
fn declared_kinds(field: &Field) -> Vec<EvidenceKindCategory> {
    let mut kinds = Vec::new();
    if field.range.is_some() {
        kinds.push(EvidenceKindCategory::Range);
    }
    if field.min_length.is_some() || field.max_length.is_some() {
        kinds.push(EvidenceKindCategory::Length);
    }
    if field.values.as_ref().is_some_and(|v| !v.is_empty()) {
        kinds.push(EvidenceKindCategory::Enum);
    }
    if field.format.is_some() {
        kinds.push(EvidenceKindCategory::Format);
    }
    kinds
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EvidenceKindCategory {
    Range,
    Enum,
    Format,
    Length,
}

fn evidence_matches_category(kind: EvidenceKind, category: EvidenceKindCategory) -> bool {
    match (kind, category) {
        (EvidenceKind::Range, EvidenceKindCategory::Range) => true,
        (EvidenceKind::Enum, EvidenceKindCategory::Enum) => true,
        (EvidenceKind::Format(_), EvidenceKindCategory::Format) => true,
        (EvidenceKind::Length, EvidenceKindCategory::Length) => true,
        _ => false,
    }
}

fn category_label(category: EvidenceKindCategory) -> &'static str {
    match category {
        EvidenceKindCategory::Range => "range",
        EvidenceKindCategory::Enum => "enum",
        EvidenceKindCategory::Format => "format",
        EvidenceKindCategory::Length => "length",
    }
}

fn role_enforces(evidence: &[&ValidationEvidence], field_name: &str, category: EvidenceKindCategory) -> bool {
    evidence.iter().any(|e| e.field_name == field_name && evidence_matches_category(e.kind, category))
}

/// Merge every `kind`-matching evidence site for `field_name` into a single
/// (min, max) bound pair. `Some(found)` as soon as any matching evidence
/// exists, even if no literal bound was captured at any site (the category
/// is still "enforced", just with an unknown bound — `role_enforces`
/// already covers presence; this only adds precision where available).
fn merged_bound(
    evidence: &[&ValidationEvidence],
    field_name: &str,
    kind: EvidenceKind,
) -> Option<(Option<f64>, Option<f64>)> {
    let mut min = None;
    let mut max = None;
    let mut found = false;

    for e in evidence {
        if e.field_name != field_name || e.kind != kind {
            continue;
        }
        found = true;
        if let Some(EvidenceValue::Bound { min: mn, max: mx }) = &e.value {
            if mn.is_some() {
                min = min.or(*mn);
            }
            if mx.is_some() {
                max = max.or(*mx);
            }
        }
    }

    found.then_some((min, max))
}

fn merged_enum(evidence: &[&ValidationEvidence], field_name: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    let mut found = false;

    for e in evidence {
        if e.field_name == field_name && e.kind == EvidenceKind::Enum {
            found = true;
            if let Some(EvidenceValue::Values(vs)) = &e.value {
                values.extend(vs.iter().cloned());
            }
        }
    }

    if !found {
        return None;
    }
    values.sort();
    values.dedup();
    Some(values)
}

fn compute_parity(manifest: &Manifest, bindings: &[ContractBinding], files: &[FileModel]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for contract in &manifest.contracts {
        let mut fields: Vec<&Field> = Vec::new();
        for endpoint in &contract.endpoints {
            fields.extend(endpoint.request.iter().flatten());
        }
        for event in &contract.messages {
            fields.extend(event.fields.iter());
        }

        let producer_binding = bindings
            .iter()
            .find(|b| b.contract_id == contract.id && matches!(b.role, ServiceRole::Producer | ServiceRole::Both));
        let consumer_bindings: Vec<&ContractBinding> = bindings
            .iter()
            .filter(|b| b.contract_id == contract.id && matches!(b.role, ServiceRole::Consumer | ServiceRole::Both))
            .collect();

        let Some(producer_binding) = producer_binding else {
            continue;
        };
        if consumer_bindings.is_empty() {
            continue;
        }

        let producer_files = files_matching(files, &producer_binding.handler_paths);
        let producer_evidence = all_evidence(&producer_files);
        let Some(producer_anchor) = anchor_file(&producer_files, files) else {
            continue;
        };

        for field in &fields {
            for category in declared_kinds(field) {
                let producer_enforces = role_enforces(&producer_evidence, &field.name, category);

                if category == EvidenceKindCategory::Length && producer_enforces {
                    let bound = merged_bound(&producer_evidence, &field.name, EvidenceKind::Length);
                    check_partial_length_enforcement(field, &contract.id, bound, producer_anchor, "producer", &mut violations);
                }

                for consumer_binding in &consumer_bindings {
                    let consumer_files = files_matching(files, &consumer_binding.handler_paths);
                    let consumer_evidence = all_evidence(&consumer_files);
                    let consumer_enforces = role_enforces(&consumer_evidence, &field.name, category);
                    let Some(consumer_anchor) = anchor_file(&consumer_files, files) else {
                        continue;
                    };

                    if category == EvidenceKindCategory::Length && consumer_enforces {
                        let bound = merged_bound(&consumer_evidence, &field.name, EvidenceKind::Length);
                        check_partial_length_enforcement(field, &contract.id, bound, consumer_anchor, "consumer", &mut violations);
                    }

                    if producer_enforces != consumer_enforces {
                        let (anchor, missing_label) =
                            if producer_enforces { (consumer_anchor, "consumer") } else { (producer_anchor, "producer") };

                        violations.push(Violation::new(
                            "CTR-strictness-parity",
                            Severity::Error,
                            format!(
                                "field '{}' has {} validation enforced by one side but not the {missing_label} (contract '{}')",
                                field.name,
                                category_label(category),
                                contract.id
                            ),
                            anchor,
                            1,
                        ));
                        continue;
                    }

                    if !producer_enforces {
                        continue;
                    }

                    match category {
                        EvidenceKindCategory::Range | EvidenceKindCategory::Length => {
                            let kind =
                                if category == EvidenceKindCategory::Range { EvidenceKind::Range } else { EvidenceKind::Length };
                            let producer_bound = merged_bound(&producer_evidence, &field.name, kind);
                            let consumer_bound = merged_bound(&consumer_evidence, &field.name, kind);
                            if let (Some(p), Some(c)) = (producer_bound, consumer_bound) {
                                report_bound_diff(
                                    field,
                                    &contract.id,
                                    category,
                                    p,
                                    c,
                                    producer_anchor,
                                    consumer_anchor,
                                    &mut violations,
                                );
                            }
                        }
                        EvidenceKindCategory::Enum => {
                            let producer_values = merged_enum(&producer_evidence, &field.name);
                            let consumer_values = merged_enum(&consumer_evidence, &field.name);
                            if let (Some(p), Some(c)) = (producer_values, consumer_values) {
                                if !p.is_empty() && !c.is_empty() && p != c {
                                    let anchor = if p.len() >= c.len() { consumer_anchor } else { producer_anchor };
                                    violations.push(Violation::new(
                                        "CTR-strictness-parity",
                                        Severity::Error,
                                        format!(
                                            "field '{}' enum subsets differ between producer {p:?} and consumer {c:?} (contract '{}')",
                                            field.name, contract.id
                                        ),
                                        anchor,
                                        1,
                                    ));
                                }
                            }
                        }
                        EvidenceKindCategory::Format => {}
                    }
                }
            }
        }
    }

    violations
}

/// §4.5: manifest declares `minLength`/`maxLength` but the checked role
/// enforces only one bound — flag the missing half as partial enforcement.
fn check_partial_length_enforcement(
    field: &Field,
    contract_id: &str,
    bound: Option<(Option<f64>, Option<f64>)>,
    anchor: &str,
    role_label: &str,
    violations: &mut Vec<Violation>,
) {
    let Some((min, max)) = bound else {
        return;
    };
    if field.min_length.is_some() && min.is_none() && max.is_some() {
        violations.push(Violation::new(
            "CTR-strictness-parity",
            Severity::Error,
            format!(
                "field '{}' manifest declares 'minLength' but the {role_label} enforces only 'maxLength' (contract '{contract_id}')",
                field.name
            ),
            anchor,
            1,
        ));
    }
    if field.max_length.is_some() && max.is_none() && min.is_some() {
        violations.push(Violation::new(
            "CTR-strictness-parity",
            Severity::Error,
            format!(
                "field '{}' manifest declares 'maxLength' but the {role_label} enforces only 'minLength' (contract '{contract_id}')",
                field.name
            ),
            anchor,
            1,
        ));
    }
}

/// §4.5: "consumer range wider than producer range is always flagged".
/// When neither bound is a strict subset of the other (§9 open question),
/// report the side with the wider (lower-or-equal) minimum — a fixed total
/// order rather than leaving the case unhandled.
fn report_bound_diff(
    field: &Field,
    contract_id: &str,
    category: EvidenceKindCategory,
    producer: (Option<f64>, Option<f64>),
    consumer: (Option<f64>, Option<f64>),
    producer_anchor: &str,
    consumer_anchor: &str,
    violations: &mut Vec<Violation>,
) {
    if producer == consumer {
        return;
    }
    let (p_min, p_max) = producer;
    let (c_min, c_max) = consumer;
    let label = if category == EvidenceKindCategory::Range { "range" } else { "length" };

    let consumer_wider = c_min.unwrap_or(f64::NEG_INFINITY) < p_min.unwrap_or(f64::NEG_INFINITY)
        || c_max.unwrap_or(f64::INFINITY) > p_max.unwrap_or(f64::INFINITY);
    let producer_wider = p_min.unwrap_or(f64::NEG_INFINITY) < c_min.unwrap_or(f64::NEG_INFINITY)
        || p_max.unwrap_or(f64::INFINITY) > c_max.unwrap_or(f64::INFINITY);

    let (anchor, message) = if consumer_wider && !producer_wider {
        (
            consumer_anchor,
            format!(
                "field '{}' consumer {label} ({c_min:?}..{c_max:?}) is wider than producer's ({p_min:?}..{p_max:?}) (contract '{contract_id}')",
                field.name
            ),
        )
    } else if producer_wider && !consumer_wider {
        (
            producer_anchor,
            format!(
                "field '{}' producer {label} ({p_min:?}..{p_max:?}) is wider than consumer's ({c_min:?}..{c_max:?}) (contract '{contract_id}')",
                field.name
            ),
        )
    } else if c_min.unwrap_or(f64::NEG_INFINITY) <= p_min.unwrap_or(f64::NEG_INFINITY) {
        (
            consumer_anchor,
            format!(
                "field '{}' consumer {label} ({c_min:?}..{c_max:?}) differs from producer's ({p_min:?}..{p_max:?}) (contract '{contract_id}')",
                field.name
            ),
        )
    } else {
        (
            producer_anchor,
            format!(
                "field '{}' producer {label} ({p_min:?}..{p_max:?}) differs from consumer's ({c_min:?}..{c_max:?}) (contract '{contract_id}')",
                field.name
            ),
        )
    };

    violations.push(Violation::new("CTR-strictness-parity", Severity::Error, message, anchor, 1));
}
