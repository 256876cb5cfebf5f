//! Structural validation of OpenAPI 3.0 documents.
//!
//! Works on the decoded payload rather than on [`crate::document`] types so
//! that whatever a client receives over the wire can be checked, whichever
//! format it was served in.

use crate::builder::template_params;
use crate::document::HttpMethod;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

const PATH_ITEM_FIELDS: [&str; 5] = ["summary", "description", "servers", "parameters", "$ref"];
const PARAMETER_LOCATIONS: [&str; 4] = ["query", "header", "path", "cookie"];

/// One schema violation, located by JSON pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

/// Summary of a document that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub path_count: usize,
    pub operation_count: usize,
}

#[derive(Default)]
struct Validator {
    issues: Vec<ValidationIssue>,
    operation_ids: HashMap<String, String>,
    operation_count: usize,
}

impl Validator {
    fn issue(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            pointer: pointer.into(),
            message: message.into(),
        });
    }

    fn non_empty_string(&mut self, object: &Map<String, Value>, key: &str, pointer: &str) {
        match object.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(Value::String(_)) => self.issue(format!("{pointer}/{key}"), "must not be empty"),
            Some(_) => self.issue(format!("{pointer}/{key}"), "must be a string"),
            None => self.issue(pointer, format!("missing required field '{key}'")),
        }
    }

    fn root(&mut self, document: &Value) -> usize {
        let Some(root) = document.as_object() else {
            self.issue("", "document must be an object");
            return 0;
        };

        match root.get("openapi").and_then(Value::as_str) {
            Some(version) if is_openapi_30(version) => {}
            Some(version) => self.issue("/openapi", format!("unsupported version '{version}'")),
            None => self.issue("", "missing required field 'openapi'"),
        }

        match root.get("info").and_then(Value::as_object) {
            Some(info) => {
                self.non_empty_string(info, "title", "/info");
                self.non_empty_string(info, "version", "/info");
            }
            None => self.issue("", "missing required object 'info'"),
        }

        if let Some(servers) = root.get("servers") {
            self.servers(servers, "/servers");
        }

        let Some(paths) = root.get("paths").and_then(Value::as_object) else {
            self.issue("", "missing required object 'paths'");
            return 0;
        };
        if paths.is_empty() {
            self.issue("/paths", "must contain at least one path");
        }
        for (path, item) in paths {
            self.path_item(path, item);
        }
        paths.len()
    }

    fn servers(&mut self, servers: &Value, pointer: &str) {
        let Some(servers) = servers.as_array() else {
            self.issue(pointer, "must be an array");
            return;
        };
        for (i, server) in servers.iter().enumerate() {
            match server.as_object() {
                Some(server) => self.non_empty_string(server, "url", &format!("{pointer}/{i}")),
                None => self.issue(format!("{pointer}/{i}"), "must be an object"),
            }
        }
    }

    fn path_item(&mut self, path: &str, item: &Value) {
        let pointer = format!("/paths/{}", escape_pointer(path));
        if !path.starts_with('/') {
            self.issue(&pointer, "path must start with '/'");
        }
        let Some(item) = item.as_object() else {
            self.issue(&pointer, "path item must be an object");
            return;
        };

        let templated = match template_params(path) {
            Ok(names) => names,
            Err(_) => {
                self.issue(&pointer, "malformed path template");
                BTreeSet::new()
            }
        };
        let shared_params = item
            .get("parameters")
            .map(|p| self.parameters(p, &format!("{pointer}/parameters")))
            .unwrap_or_default();

        for (key, value) in item {
            if HttpMethod::ALL.iter().any(|m| m.as_str() == key) {
                let op_pointer = format!("{pointer}/{key}");
                let mut declared = shared_params.clone();
                declared.extend(self.operation(value, &op_pointer));
                for name in &templated {
                    if !declared.contains(*name) {
                        self.issue(
                            &op_pointer,
                            format!("no path parameter declared for '{{{name}}}'"),
                        );
                    }
                }
            } else if !PATH_ITEM_FIELDS.contains(&key.as_str()) && !key.starts_with("x-") {
                self.issue(format!("{pointer}/{key}"), "unknown path item field");
            }
        }
    }

    /// Returns the names of the operation's path parameters
    fn operation(&mut self, operation: &Value, pointer: &str) -> BTreeSet<String> {
        self.operation_count += 1;
        let Some(operation) = operation.as_object() else {
            self.issue(pointer, "operation must be an object");
            return BTreeSet::new();
        };

        if let Some(id) = operation.get("operationId") {
            match id.as_str() {
                Some(id) => {
                    if let Some(first) = self.operation_ids.get(id) {
                        let message = format!("operationId '{id}' already used at {first}");
                        self.issue(format!("{pointer}/operationId"), message);
                    } else {
                        self.operation_ids.insert(id.to_string(), pointer.to_string());
                    }
                }
                None => self.issue(format!("{pointer}/operationId"), "must be a string"),
            }
        }

        if let Some(tags) = operation.get("tags") {
            let all_strings = tags
                .as_array()
                .map(|tags| tags.iter().all(Value::is_string))
                .unwrap_or(false);
            if !all_strings {
                self.issue(format!("{pointer}/tags"), "must be an array of strings");
            }
        }

        let declared = operation
            .get("parameters")
            .map(|p| self.parameters(p, &format!("{pointer}/parameters")))
            .unwrap_or_default();

        if let Some(body) = operation.get("requestBody") {
            let has_content = body
                .get("content")
                .and_then(Value::as_object)
                .map(|c| !c.is_empty())
                .unwrap_or(false);
            if !has_content {
                self.issue(
                    format!("{pointer}/requestBody"),
                    "requestBody must declare content",
                );
            }
        }

        self.responses(operation.get("responses"), &format!("{pointer}/responses"));
        declared
    }

    fn parameters(&mut self, parameters: &Value, pointer: &str) -> BTreeSet<String> {
        let mut path_params = BTreeSet::new();
        let Some(parameters) = parameters.as_array() else {
            self.issue(pointer, "must be an array");
            return path_params;
        };

        for (i, parameter) in parameters.iter().enumerate() {
            let p_pointer = format!("{pointer}/{i}");
            let Some(parameter) = parameter.as_object() else {
                self.issue(&p_pointer, "parameter must be an object");
                continue;
            };
            if parameter.contains_key("$ref") {
                continue;
            }
            self.non_empty_string(parameter, "name", &p_pointer);

            match parameter.get("in").and_then(Value::as_str) {
                Some("path") => {
                    if parameter.get("required") != Some(&Value::Bool(true)) {
                        self.issue(
                            format!("{p_pointer}/required"),
                            "path parameters must be required",
                        );
                    }
                    if let Some(name) = parameter.get("name").and_then(Value::as_str) {
                        path_params.insert(name.to_string());
                    }
                }
                Some(location) if PARAMETER_LOCATIONS.contains(&location) => {}
                Some(location) => self.issue(
                    format!("{p_pointer}/in"),
                    format!("invalid parameter location '{location}'"),
                ),
                None => self.issue(&p_pointer, "missing required field 'in'"),
            }
        }
        path_params
    }

    fn responses(&mut self, responses: Option<&Value>, pointer: &str) {
        let Some(responses) = responses.and_then(Value::as_object) else {
            self.issue(pointer, "operation must declare responses");
            return;
        };
        if responses.is_empty() {
            self.issue(pointer, "must declare at least one response");
        }
        for (status, response) in responses {
            let r_pointer = format!("{pointer}/{}", escape_pointer(status));
            if !is_response_key(status) {
                self.issue(&r_pointer, format!("invalid response key '{status}'"));
            }
            match response.as_object() {
                Some(response) if response.contains_key("$ref") => {}
                Some(response) => match response.get("description") {
                    Some(Value::String(_)) => {}
                    _ => self.issue(&r_pointer, "response must have a string description"),
                },
                None => self.issue(&r_pointer, "response must be an object"),
            }
        }
    }
}

/// Validate a decoded document against the OpenAPI 3.0 structural rules
pub fn validate_document(document: &Value) -> Result<ValidationReport, Vec<ValidationIssue>> {
    let mut validator = Validator::default();
    let path_count = validator.root(document);
    if validator.issues.is_empty() {
        Ok(ValidationReport {
            path_count,
            operation_count: validator.operation_count,
        })
    } else {
        Err(validator.issues)
    }
}

/// Whether a decoded document has `method` documented under `path`
pub fn has_operation(document: &Value, path: &str, method: &str) -> bool {
    document
        .get("paths")
        .and_then(|paths| paths.get(path))
        .and_then(|item| item.get(method.to_lowercase()))
        .map(Value::is_object)
        .unwrap_or(false)
}

fn is_openapi_30(version: &str) -> bool {
    match version.strip_prefix("3.0.") {
        Some(patch) => !patch.is_empty() && patch.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// `default`, a 3-digit status code or an `NXX` range
pub(crate) fn is_response_key(key: &str) -> bool {
    if key == "default" {
        return true;
    }
    let bytes = key.as_bytes();
    if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
        return false;
    }
    let rest = &key[1..];
    rest.chars().all(|c| c.is_ascii_digit()) || rest == "XX"
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
