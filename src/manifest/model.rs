//! The parsed manifest document (§3, §6).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::FormatKind;

/// Languages the manifest may declare for a service (§6: "Languages
/// supported in v1: {typescript, go}").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestLanguage {
    Typescript,
    Go,
}

impl fmt::Display for ManifestLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestLanguage::Typescript => write!(f, "typescript"),
            ManifestLanguage::Go => write!(f, "go"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    Producer,
    Consumer,
    Both,
}

impl ServiceRole {
    /// Parse a role string from per-service `.stricture.yml` (`manifest.contracts[].role`),
    /// where the document is YAML-untyped text rather than this enum directly.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "producer" => Some(ServiceRole::Producer),
            "consumer" => Some(ServiceRole::Consumer),
            "both" => Some(ServiceRole::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub repo: Option<String>,
    pub language: ManifestLanguage,
    pub role: ServiceRole,
    #[serde(default = "default_stricture_config")]
    pub stricture_config: String,
}

fn default_stricture_config() -> String {
    ".stricture.yml".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    MessageQueue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        };
        write!(f, "{s}")
    }
}

/// A declared contract field (§3 `Field`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub range: Option<Range>,
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub format: Option<FormatKind>,
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Enum,
    Boolean,
    Object,
    Array,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Enum => "enum",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub request: Option<Vec<Field>>,
    #[serde(default)]
    pub response: Option<Vec<Field>>,
    #[serde(default)]
    pub status_codes: Vec<u16>,
    #[serde(default)]
    pub error_shape: Option<Vec<Field>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub producer: String,
    #[serde(default)]
    pub consumers: Vec<String>,
    pub protocol: Protocol,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub messages: Vec<Event>,
}

/// Strictness lattice (Glossary): `minimal <= basic <= standard <= strict
/// <= exhaustive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictnessLevel {
    Minimal,
    Basic,
    Standard,
    Strict,
    Exhaustive,
}

impl fmt::Display for StrictnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrictnessLevel::Minimal => "minimal",
            StrictnessLevel::Basic => "basic",
            StrictnessLevel::Standard => "standard",
            StrictnessLevel::Strict => "strict",
            StrictnessLevel::Exhaustive => "exhaustive",
        };
        write!(f, "{s}")
    }
}

impl Default for StrictnessLevel {
    fn default() -> Self {
        StrictnessLevel::Minimal
    }
}

/// The five named strictness rules (§4.4), all default `false`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StrictnessRules {
    #[serde(default, rename = "numeric-range-required")]
    pub numeric_range_required: bool,
    #[serde(default, rename = "string-length-required")]
    pub string_length_required: bool,
    #[serde(default, rename = "enum-exhaustive")]
    pub enum_exhaustive: bool,
    #[serde(default, rename = "error-shape-required")]
    pub error_shape_required: bool,
    #[serde(default, rename = "status-codes-exhaustive")]
    pub status_codes_exhaustive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Strictness {
    #[serde(default)]
    pub minimum: StrictnessLevel,
    #[serde(default)]
    pub rules: StrictnessRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: String,
    pub name: String,
    pub services: BTreeMap<String, Service>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub strictness: Strictness,
}
