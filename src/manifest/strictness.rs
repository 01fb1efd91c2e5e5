//! Strictness level computation (§4.4) and the five named strictness
//! rules, evaluated against the *manifest* declaration (not code).
//!
//! Design Note §9 (open question): constraint compatibility is validated
//! strictly by `parse::validate_field_constraints` before a manifest is
//! ever handed to these functions, so a field with `required` plus a format
//! on a non-string type can never reach `field_level` — invalid
//! combinations are rejected at parse time, not silently computed over.

use crate::manifest::model::{Contract, Endpoint, Field, FieldType, Manifest, StrictnessLevel};
use crate::model::Violation;

/// The strictness level a single field satisfies (§4.4).
pub fn field_level(field: &Field) -> StrictnessLevel {
    let has_format = field.format.is_some();
    let has_value_space_constraint = field.range.is_some()
        || field.min_length.is_some()
        || field.max_length.is_some()
        || field.values.as_ref().is_some_and(|v| !v.is_empty());

    if has_value_space_constraint {
        StrictnessLevel::Strict
    } else if field.field_type == FieldType::String && has_format {
        StrictnessLevel::Standard
    } else if field.required {
        StrictnessLevel::Basic
    } else {
        StrictnessLevel::Minimal
    }
}

/// An endpoint's level is the minimum of its fields' levels, bounded above
/// by whether `error_shape` and `status_codes` are present (§4.4); an
/// endpoint reaches `exhaustive` only when every field is `strict` and both
/// are present.
pub fn endpoint_level(endpoint: &Endpoint) -> StrictnessLevel {
    let fields: Vec<&Field> = [&endpoint.request, &endpoint.response, &endpoint.error_shape]
        .into_iter()
        .flatten()
        .flatten()
        .collect();

    let min_field_level = fields
        .iter()
        .map(|f| field_level(f))
        .min()
        .unwrap_or(StrictnessLevel::Exhaustive);

    let has_error_shape = endpoint.error_shape.is_some();
    let has_status_codes = !endpoint.status_codes.is_empty();

    if min_field_level == StrictnessLevel::Strict && has_error_shape && has_status_codes {
        StrictnessLevel::Exhaustive
    } else {
        min_field_level.min(StrictnessLevel::Strict)
    }
}

/// Manifest-level findings for `strictness.minimum` and the five named
/// rules (§4.4), distinct from code-level CTR findings.
pub fn check_manifest_strictness(manifest: &Manifest) -> Vec<Violation> {
    let mut violations = Vec::new();
    let rules = &manifest.strictness.rules;

    for contract in &manifest.contracts {
        for endpoint in &contract.endpoints {
            check_endpoint_minimum(manifest, contract, endpoint, &mut violations);

            for fields in [&endpoint.request, &endpoint.response, &endpoint.error_shape]
                .into_iter()
                .flatten()
            {
                for field in fields {
                    check_field_rules(field, rules, &mut violations);
                }
            }

            if rules.error_shape_required
                && endpoint.status_codes.iter().any(|c| !(200..300).contains(c))
                && endpoint.error_shape.is_none()
            {
                violations.push(manifest_violation(
                    &contract.id,
                    format!(
                        "endpoint {} {} has a non-2xx status code but no 'error_shape'",
                        endpoint.method, endpoint.path
                    ),
                ));
            }
            if rules.status_codes_exhaustive && endpoint.status_codes.is_empty() {
                violations.push(manifest_violation(
                    &contract.id,
                    format!("endpoint {} {} declares no 'status_codes'", endpoint.method, endpoint.path),
                ));
            }
        }
        for event in &contract.messages {
            for field in &event.fields {
                check_field_rules(field, rules, &mut violations);
            }
        }
    }

    violations
}

fn check_endpoint_minimum(
    manifest: &Manifest,
    contract: &Contract,
    endpoint: &Endpoint,
    violations: &mut Vec<Violation>,
) {
    let minimum = manifest.strictness.minimum;
    for fields in [&endpoint.request, &endpoint.response, &endpoint.error_shape]
        .into_iter()
        .flatten()
    {
        for field in fields {
            let level = field_level(field);
            if level < minimum {
                violations.push(manifest_violation(
                    &contract.id,
                    format!("Field '{}' is '{level}' but minimum is '{minimum}'", field.name),
                ));
            }
        }
    }
}

fn check_field_rules(field: &Field, rules: &crate::manifest::model::StrictnessRules, violations: &mut Vec<Violation>) {
    if rules.numeric_range_required
        && matches!(field.field_type, FieldType::Integer | FieldType::Number)
        && field.range.is_none()
    {
        violations.push(manifest_violation(
            "strictness",
            format!("field '{}' must declare 'range'", field.name),
        ));
    }
    if rules.string_length_required && field.field_type == FieldType::String && field.max_length.is_none() {
        violations.push(manifest_violation(
            "strictness",
            format!("field '{}' must declare 'maxLength'", field.name),
        ));
    }
    if rules.enum_exhaustive
        && field.field_type == FieldType::Enum
        && !field.values.as_ref().is_some_and(|v| !v.is_empty())
    {
        violations.push(manifest_violation(
            "strictness",
            format!("field '{}' must declare non-empty 'values'", field.name),
        ));
    }
}

fn manifest_violation(contract_id: &str, message: String) -> Violation {
    Violation::new(
        "manifest-strictness",
        crate::model::Severity::Error,
        message,
        contract_id,
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormatKind;

    fn string_field(name: &str, required: bool, format: Option<FormatKind>) -> Field {
        Field {
            name: name.to_string(),
            field_type: FieldType::String,
            required,
            range: None,
            min_length: None,
            max_length: None,
            precision: None,
            format,
            values: None,
        }
    }

    #[test]
    fn email_field_without_length_is_standard() {
        let field = string_field("email", true, Some(FormatKind::Email));
        assert_eq!(field_level(&field), StrictnessLevel::Standard);
    }

    #[test]
    fn field_with_max_length_is_strict() {
        let mut field = string_field("email", true, Some(FormatKind::Email));
        field.max_length = Some(255);
        assert_eq!(field_level(&field), StrictnessLevel::Strict);
    }

    #[test]
    fn required_only_field_is_basic() {
        let field = string_field("name", true, None);
        assert_eq!(field_level(&field), StrictnessLevel::Basic);
    }
}
