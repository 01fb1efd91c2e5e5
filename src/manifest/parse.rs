//! Manifest loading: a permissive `serde_yaml` pass followed by a manual
//! field walk for precise parse errors and unknown-field warnings (§4.4),
//! since a bare `#[derive(Deserialize)]` only yields generic serde errors.

use serde_yaml::Value;

use crate::error::StrictureError;
use crate::manifest::model::{FieldType, Manifest};

const SUPPORTED_MANIFEST_VERSIONS: &[&str] = &["1.0"];

const TOP_LEVEL_KEYS: &[&str] = &["manifest_version", "name", "services", "contracts", "strictness"];
const SERVICE_KEYS: &[&str] = &["repo", "language", "role", "stricture_config"];
const CONTRACT_KEYS: &[&str] = &["id", "producer", "consumers", "protocol", "endpoints", "queue", "messages"];
const ENDPOINT_KEYS: &[&str] = &["path", "method", "request", "response", "status_codes", "error_shape"];
const FIELD_KEYS: &[&str] = &[
    "name", "type", "required", "range", "min_length", "max_length", "precision", "format", "values",
];

fn parse_error(path: &str, detail: impl Into<String>) -> StrictureError {
    StrictureError::Parse {
        path: path.to_string(),
        detail: detail.into(),
    }
}

/// Load and validate a manifest document. Returns the parsed manifest plus
/// any non-fatal warnings (unknown fields, missing `repo`, deduplicated
/// enum values) (§4.4).
pub fn load_manifest(path: &str, source: &str) -> Result<(Manifest, Vec<String>), StrictureError> {
    let raw: Value = serde_yaml::from_str(source).map_err(|e| parse_error(path, e.to_string()))?;
    let mut warnings = Vec::new();

    collect_unknown_fields(&raw, TOP_LEVEL_KEYS, "manifest", &mut warnings);
    if let Some(services) = raw.get("services").and_then(Value::as_mapping) {
        for (_, service) in services {
            collect_unknown_fields(service, SERVICE_KEYS, "service", &mut warnings);
        }
    }
    if let Some(contracts) = raw.get("contracts").and_then(Value::as_sequence) {
        for contract in contracts {
            collect_unknown_fields(contract, CONTRACT_KEYS, "contract", &mut warnings);
            if let Some(endpoints) = contract.get("endpoints").and_then(Value::as_sequence) {
                for endpoint in endpoints {
                    collect_unknown_fields(endpoint, ENDPOINT_KEYS, "endpoint", &mut warnings);
                    for key in ["request", "response", "error_shape"] {
                        if let Some(fields) = endpoint.get(key).and_then(Value::as_sequence) {
                            for field in fields {
                                collect_unknown_fields(field, FIELD_KEYS, "field", &mut warnings);
                            }
                        }
                    }
                }
            }
        }
    }

    let version = raw
        .get("manifest_version")
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error(path, "missing required field 'manifest_version'"))?;
    if !SUPPORTED_MANIFEST_VERSIONS.contains(&version) {
        return Err(parse_error(
            path,
            format!(
                "unsupported manifest_version '{version}'; supported: {SUPPORTED_MANIFEST_VERSIONS:?}"
            ),
        ));
    }

    let mut manifest: Manifest = serde_yaml::from_value(raw).map_err(|e| {
        parse_error(
            path,
            format!("{e} (languages supported in v1: {{typescript, go}})"),
        )
    })?;

    validate_references(&manifest, path)?;
    validate_roles(&manifest, path)?;
    validate_uniqueness(&manifest, path)?;
    validate_field_constraints(&manifest, path)?;
    dedup_enum_values(&mut manifest, &mut warnings);

    Ok((manifest, warnings))
}

fn collect_unknown_fields(value: &Value, known: &[&str], context: &str, warnings: &mut Vec<String>) {
    let Some(mapping) = value.as_mapping() else {
        return;
    };
    for key in mapping.keys() {
        if let Some(key) = key.as_str() {
            if !known.contains(&key) {
                warnings.push(format!("unknown field '{key}' in {context}"));
            }
        }
    }
}

/// I1: every `producer` and every element of `consumers` is a key in `services`.
fn validate_references(manifest: &Manifest, path: &str) -> Result<(), StrictureError> {
    for contract in &manifest.contracts {
        if !manifest.services.contains_key(&contract.producer) {
            return Err(parse_error(
                path,
                format!(
                    "contract '{}' references unknown producer service '{}'",
                    contract.id, contract.producer
                ),
            ));
        }
        for consumer in &contract.consumers {
            if !manifest.services.contains_key(consumer) {
                return Err(parse_error(
                    path,
                    format!(
                        "contract '{}' references unknown consumer service '{consumer}'",
                        contract.id
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// I2: each declared role is consistent with where the service appears.
fn validate_roles(manifest: &Manifest, path: &str) -> Result<(), StrictureError> {
    use crate::manifest::model::ServiceRole;
    for contract in &manifest.contracts {
        if let Some(service) = manifest.services.get(&contract.producer) {
            if service.role == ServiceRole::Consumer {
                return Err(parse_error(
                    path,
                    format!(
                        "service '{}' has role 'consumer' but is the producer of contract '{}'",
                        contract.producer, contract.id
                    ),
                ));
            }
        }
        for consumer in &contract.consumers {
            if let Some(service) = manifest.services.get(consumer) {
                if service.role == ServiceRole::Producer {
                    return Err(parse_error(
                        path,
                        format!(
                            "service '{consumer}' has role 'producer' but is a consumer of contract '{}'",
                            contract.id
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// I3: no two contracts share an id; no two endpoints in one contract share
/// (path, method); no two events in one queue share `event`.
fn validate_uniqueness(manifest: &Manifest, path: &str) -> Result<(), StrictureError> {
    let mut seen_contracts = std::collections::HashSet::new();
    for contract in &manifest.contracts {
        if !seen_contracts.insert(&contract.id) {
            return Err(parse_error(path, format!("duplicate contract id '{}'", contract.id)));
        }

        let mut seen_endpoints = std::collections::HashSet::new();
        for endpoint in &contract.endpoints {
            if !seen_endpoints.insert((endpoint.path.clone(), endpoint.method)) {
                return Err(parse_error(
                    path,
                    format!(
                        "contract '{}' declares duplicate endpoint {} {}",
                        contract.id, endpoint.method, endpoint.path
                    ),
                ));
            }
        }

        let mut seen_events = std::collections::HashSet::new();
        for event in &contract.messages {
            if !seen_events.insert(&event.event) {
                return Err(parse_error(
                    path,
                    format!("contract '{}' declares duplicate event '{}'", contract.id, event.event),
                ));
            }
        }
    }
    Ok(())
}

/// I4: constraint keys are mutually exclusive with incompatible types (§4.4
/// constraint compatibility matrix); `range` min <= max; `min_length` <=
/// `max_length`; `precision` >= 0 (enforced by the `u32` type itself).
fn validate_field_constraints(manifest: &Manifest, path: &str) -> Result<(), StrictureError> {
    for contract in &manifest.contracts {
        for endpoint in &contract.endpoints {
            for fields in [&endpoint.request, &endpoint.response, &endpoint.error_shape]
                .into_iter()
                .flatten()
            {
                for field in fields {
                    validate_one_field(field, path)?;
                }
            }
        }
        for event in &contract.messages {
            for field in &event.fields {
                validate_one_field(field, path)?;
            }
        }
    }
    Ok(())
}

fn validate_one_field(field: &crate::manifest::model::Field, path: &str) -> Result<(), StrictureError> {
    let incompatible = |what: &str| {
        parse_error(
            path,
            format!("field '{}' of type {} cannot declare '{what}'", field.name, field.field_type),
        )
    };

    match field.field_type {
        FieldType::String => {
            if field.range.is_some() {
                return Err(incompatible("range"));
            }
            if field.precision.is_some() {
                return Err(incompatible("precision"));
            }
            if field.values.is_some() {
                return Err(incompatible("values"));
            }
        }
        FieldType::Integer | FieldType::Number => {
            if field.min_length.is_some() || field.max_length.is_some() {
                return Err(incompatible("minLength/maxLength"));
            }
            if field.format.is_some() {
                return Err(incompatible("format"));
            }
            if field.values.is_some() {
                return Err(incompatible("values"));
            }
            if field.field_type == FieldType::Integer && field.precision.is_some() {
                return Err(incompatible("precision"));
            }
        }
        FieldType::Enum => {
            if field.range.is_some()
                || field.min_length.is_some()
                || field.max_length.is_some()
                || field.precision.is_some()
                || field.format.is_some()
            {
                return Err(incompatible("a value-space constraint other than 'values'"));
            }
        }
        FieldType::Boolean | FieldType::Object | FieldType::Array => {
            if field.range.is_some()
                || field.min_length.is_some()
                || field.max_length.is_some()
                || field.precision.is_some()
                || field.format.is_some()
                || field.values.is_some()
            {
                return Err(incompatible("any constraint beyond 'required'"));
            }
        }
    }

    if let Some(range) = field.range {
        if range.min > range.max {
            return Err(parse_error(
                path,
                format!("field '{}' has range.min > range.max", field.name),
            ));
        }
    }
    if let (Some(min), Some(max)) = (field.min_length, field.max_length) {
        if min > max {
            return Err(parse_error(
                path,
                format!("field '{}' has min_length > max_length", field.name),
            ));
        }
    }

    Ok(())
}

/// I5: enum `values` non-empty (hard error); duplicates cause a warning and
/// are deduplicated in the parsed form.
fn dedup_enum_values(manifest: &mut Manifest, warnings: &mut Vec<String>) {
    for contract in &mut manifest.contracts {
        for endpoint in &mut contract.endpoints {
            for fields in [&mut endpoint.request, &mut endpoint.response, &mut endpoint.error_shape]
                .into_iter()
                .flatten()
            {
                for field in fields {
                    dedup_field_values(field, warnings);
                }
            }
        }
        for event in &mut contract.messages {
            for field in &mut event.fields {
                dedup_field_values(field, warnings);
            }
        }
    }
}

fn dedup_field_values(field: &mut crate::manifest::model::Field, warnings: &mut Vec<String>) {
    let Some(values) = field.values.as_mut() else {
        return;
    };
    let mut seen = std::collections::HashSet::new();
    let original_len = values.len();
    values.retain(|v| seen.insert(v.clone()));
    if values.len() != original_len {
        warnings.push(format!("field '{}' had duplicate enum values; deduplicated", field.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
manifest_version: "1.0"
name: demo
services:
  user-service:
    language: go
    role: producer
  web-frontend:
    language: typescript
    role: consumer
contracts:
  - id: user-api
    producer: user-service
    consumers: [web-frontend]
    protocol: http
    endpoints:
      - path: /users
        method: GET
        status_codes: [200]
"#;

    #[test]
    fn parses_minimal_valid_manifest() {
        let (manifest, warnings) = load_manifest("manifest.yml", MINIMAL_YAML).unwrap();
        assert_eq!(manifest.name, "demo");
        assert_eq!(manifest.contracts.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn rejects_unsupported_manifest_version() {
        let yaml = MINIMAL_YAML.replacen("1.0", "2.0", 1);
        let result = load_manifest("manifest.yml", &yaml);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_producer_reference() {
        let yaml = MINIMAL_YAML.replace("producer: user-service", "producer: ghost-service");
        let result = load_manifest("manifest.yml", &yaml);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_endpoint() {
        let yaml = format!(
            "{}\n      - path: /users\n        method: GET\n        status_codes: [200]\n",
            MINIMAL_YAML.trim_end()
        );
        let result = load_manifest("manifest.yml", &yaml);
        assert!(result.is_err());
    }

    #[test]
    fn warns_and_dedups_duplicate_enum_values() {
        let yaml = format!(
            "{}\n        request:\n          - name: status\n            type: enum\n            values: [active, active, inactive]\n",
            MINIMAL_YAML.trim_end()
        );
        let (manifest, warnings) = load_manifest("manifest.yml", &yaml).unwrap();
        let field = &manifest.contracts[0].endpoints[0].request.as_ref().unwrap()[0];
        assert_eq!(field.values.as_ref().unwrap().len(), 2);
        assert!(warnings.iter().any(|w| w.contains("duplicate enum values")));
    }

    #[test]
    fn rejects_string_field_with_range() {
        let yaml = format!(
            "{}\n        request:\n          - name: name\n            type: string\n            range: {{min: 0, max: 10}}\n",
            MINIMAL_YAML.trim_end()
        );
        let result = load_manifest("manifest.yml", &yaml);
        assert!(result.is_err());
    }

    #[test]
    fn flags_unknown_top_level_field_as_warning() {
        let yaml = format!("{MINIMAL_YAML}\nextra_field: true\n");
        let (_manifest, warnings) = load_manifest("manifest.yml", &yaml).unwrap();
        assert!(warnings.iter().any(|w| w.contains("extra_field")));
    }
}
