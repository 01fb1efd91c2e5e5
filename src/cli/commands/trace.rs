//! `stricture trace FILE` (§6): validate a captured HTTP trace (HAR, a
//! flattened OpenTelemetry span export, or a plain JSON array of
//! `{method, path}` calls — auto-detected by extension, or forced with
//! `--trace-format`) against the manifest's declared endpoints.
//!
//! Full HAR/OTEL parsing is out of scope here (it's treated as an external
//! collaborator); this extracts the `(method, path)` pairs each format
//! carries and leaves everything else unread.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::cli::exit_status::ExitStatus;
use crate::manifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceFormat {
    Har,
    Otel,
    Custom,
}

impl TraceFormat {
    fn detect(path: &Path, override_format: Option<&str>) -> Result<Self> {
        if let Some(raw) = override_format {
            return match raw.to_ascii_lowercase().as_str() {
                "har" => Ok(TraceFormat::Har),
                "otel" => Ok(TraceFormat::Otel),
                "custom" => Ok(TraceFormat::Custom),
                other => bail!("unknown --trace-format value '{other}' (expected har, otel, or custom)"),
            };
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("har") => Ok(TraceFormat::Har),
            _ => Ok(TraceFormat::Custom),
        }
    }
}

#[derive(Debug, Clone)]
struct TracedCall {
    method: String,
    path: String,
}

fn extract_har(root: &Value) -> Vec<TracedCall> {
    root.pointer("/log/entries")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let method = entry.pointer("/request/method")?.as_str()?.to_string();
                    let url = entry.pointer("/request/url")?.as_str()?;
                    Some(TracedCall { method, path: url_to_path(url) })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn extract_otel(root: &Value) -> Vec<TracedCall> {
    let spans = root
        .pointer("/resourceSpans")
        .map(|_| collect_otel_spans(root))
        .unwrap_or_default();
    spans
        .into_iter()
        .filter_map(|span| {
            let attrs = span.pointer("/attributes")?.as_array()?;
            let find = |key: &str| {
                attrs.iter().find_map(|a| {
                    (a.get("key")?.as_str()? == key)
                        .then(|| a.pointer("/value/stringValue")?.as_str().map(str::to_string))
                        .flatten()
                })
            };
            let method = find("http.method")?;
            let path = find("http.target").or_else(|| find("http.url").map(|u| url_to_path(&u)))?;
            Some(TracedCall { method, path })
        })
        .collect()
}

fn collect_otel_spans(root: &Value) -> Vec<Value> {
    root.pointer("/resourceSpans")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|rs| rs.pointer("/scopeSpans").and_then(Value::as_array))
        .flatten()
        .filter_map(|ss| ss.pointer("/spans").and_then(Value::as_array))
        .flatten()
        .cloned()
        .collect()
}

fn extract_custom(root: &Value) -> Vec<TracedCall> {
    root.as_array()
        .map(|calls| {
            calls
                .iter()
                .filter_map(|call| {
                    let method = call.get("method")?.as_str()?.to_string();
                    let path = call.get("path").or_else(|| call.get("url"))?.as_str()?;
                    Some(TracedCall { method, path: url_to_path(path) })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn url_to_path(url: &str) -> String {
    let without_scheme = url.split("://").next_back().unwrap_or(url);
    let path = without_scheme.splitn(2, '/').nth(1).map(|rest| format!("/{rest}")).unwrap_or_else(|| "/".to_string());
    path.split('?').next().unwrap_or(&path).to_string()
}

/// Collapse concrete path-parameter values (numeric ids, UUIDs) to `*` so
/// a traced `/users/42` lines up with a declared `/users/:id` (§4.5).
fn normalize_traced_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.is_empty() {
                segment.to_string()
            } else if segment.chars().all(|c| c.is_ascii_digit()) || is_uuid_like(segment) {
                "*".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_uuid_like(segment: &str) -> bool {
    segment.len() == 36 && segment.chars().enumerate().all(|(i, c)| match i {
        8 | 13 | 18 | 23 => c == '-',
        _ => c.is_ascii_hexdigit(),
    })
}

pub fn run(root: &Path, file: &Path, trace_format: Option<&str>, manifest_path: Option<&PathBuf>) -> Result<ExitStatus> {
    let manifest_path = manifest_path.ok_or_else(|| anyhow::anyhow!("trace validation requires --manifest"))?;
    let manifest_source = fs::read_to_string(manifest_path).with_context(|| format!("reading {}", manifest_path.display()))?;
    let (loaded_manifest, _warnings) = manifest::load_manifest(&manifest_path.display().to_string(), &manifest_source)?;

    let trace_source = fs::read_to_string(root.join(file)).with_context(|| format!("reading {}", file.display()))?;
    let trace_json: Value = serde_json::from_str(&trace_source).with_context(|| format!("parsing {} as JSON", file.display()))?;

    let format = TraceFormat::detect(file, trace_format)?;
    let calls = match format {
        TraceFormat::Har => extract_har(&trace_json),
        TraceFormat::Otel => extract_otel(&trace_json),
        TraceFormat::Custom => extract_custom(&trace_json),
    };

    let declared: Vec<(String, String)> = loaded_manifest
        .contracts
        .iter()
        .flat_map(|c| c.endpoints.iter())
        .map(|e| (e.method.to_string(), crate::adapters::handlers::normalize_path(&e.path)))
        .collect();

    let mut undeclared = Vec::new();
    for call in &calls {
        let normalized = crate::adapters::handlers::normalize_path(&normalize_traced_path(&call.path));
        if !declared.iter().any(|(m, p)| *m == call.method && *p == normalized) {
            undeclared.push(format!("{} {}", call.method, call.path));
        }
    }

    println!("traced {} call(s), {} declared endpoint(s)", calls.len(), declared.len());
    if undeclared.is_empty() {
        println!("every traced call matches a declared endpoint");
        Ok(ExitStatus::Success)
    } else {
        for call in &undeclared {
            println!("undeclared call: {call}");
        }
        Ok(ExitStatus::Failure)
    }
}
