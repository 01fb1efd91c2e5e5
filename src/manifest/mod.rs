//! Manifest parsing & strictness computation (C4, §4.4).

mod model;
mod parse;
mod strictness;

pub use model::{
    Contract, Endpoint, Event, Field, FieldType, HttpMethod, Manifest, ManifestLanguage, Protocol,
    Range, Service, ServiceRole, Strictness, StrictnessLevel, StrictnessRules,
};
pub use parse::load_manifest;
pub use strictness::{check_manifest_strictness, endpoint_level, field_level};
