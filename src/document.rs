//! Serde-typed OpenAPI 3.0 document tree.
//!
//! The document is the sole output of a generation run, so its serialization
//! must be byte-stable: keyed sections use `BTreeMap` and everything else is
//! either a fixed-order struct or an insertion-ordered `Vec`. Opaque schema
//! bodies contributed by collaborators travel as [`serde_json::Value`].

use crate::extractor::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A security requirement: scheme name mapped to its scope list (always
/// empty for the schemes this generator emits).
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Complete OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// Server list
    pub servers: Vec<Server>,
    /// Global security alternatives, one per configured auth method
    pub security: Vec<SecurityRequirement>,
    /// Endpoint tags, deduplicated, in first-seen order
    pub tags: Vec<Tag>,
    /// Shared components (schemas, responses, security schemes)
    pub components: Components,
    /// Paths collection (URL path -> PathItem)
    pub paths: BTreeMap<String, PathItem>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API license
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// OpenAPI License object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    /// License name
    pub name: String,
    /// License URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,
    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Tag object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions, keyed by model name
    pub schemas: BTreeMap<String, Value>,
    /// Shared response definitions, keyed by response short name
    pub responses: BTreeMap<String, Value>,
    /// Security scheme definitions, keyed by auth method short name
    #[serde(rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, Value>,
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    /// Store an operation under its method slot, replacing any existing one.
    pub fn set(&mut self, method: HttpMethod, operation: Operation) {
        match method {
            HttpMethod::Get => self.get = Some(operation),
            HttpMethod::Post => self.post = Some(operation),
            HttpMethod::Put => self.put = Some(operation),
            HttpMethod::Patch => self.patch = Some(operation),
            HttpMethod::Delete => self.delete = Some(operation),
        }
    }

    /// Look up the operation for a method, if one was set.
    pub fn get(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Tags grouping this operation
    pub tags: Vec<String>,
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Deprecation marker, omitted unless set
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Method-scoped security override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    /// Parameters (query)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses, keyed by status code, referencing shared components
    pub responses: BTreeMap<String, ResponseRef>,
}

fn is_false(value: &bool) -> bool {
    !value
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (always "query" for this generator)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    pub schema: Value,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    /// Content types and their schemas
    pub content: BTreeMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    pub schema: Value,
}

/// Reference to a shared `components.responses` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRef {
    /// Component reference (e.g. `#/components/responses/Success`)
    #[serde(rename = "$ref")]
    pub reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_operation() -> Operation {
        Operation {
            tags: vec!["SYSTEM".to_string()],
            summary: None,
            description: None,
            operation_id: Some("getSystemVersionEndpoint".to_string()),
            deprecated: false,
            security: None,
            parameters: None,
            request_body: None,
            responses: BTreeMap::new(),
        }
    }

    #[test]
    fn test_path_item_set_and_get() {
        let mut item = PathItem::default();
        item.set(HttpMethod::Get, minimal_operation());

        assert!(item.get(HttpMethod::Get).is_some());
        assert!(item.get(HttpMethod::Post).is_none());
    }

    #[test]
    fn test_operation_skips_absent_fields() {
        let value = serde_json::to_value(minimal_operation()).unwrap();

        let object = value.as_object().unwrap();
        assert!(!object.contains_key("summary"));
        assert!(!object.contains_key("deprecated"));
        assert!(!object.contains_key("security"));
        assert!(!object.contains_key("requestBody"));
        assert_eq!(object["operationId"], "getSystemVersionEndpoint");
    }

    #[test]
    fn test_deprecated_serialized_when_set() {
        let mut operation = minimal_operation();
        operation.deprecated = true;

        let value = serde_json::to_value(operation).unwrap();

        assert_eq!(value["deprecated"], json!(true));
    }

    #[test]
    fn test_response_ref_serializes_as_ref() {
        let reference = ResponseRef {
            reference: "#/components/responses/Success".to_string(),
        };

        let value = serde_json::to_value(reference).unwrap();

        assert_eq!(value, json!({"$ref": "#/components/responses/Success"}));
    }

    #[test]
    fn test_components_rename() {
        let mut components = Components::default();
        components
            .security_schemes
            .insert("BasicAuth".to_string(), json!({"type": "http"}));

        let value = serde_json::to_value(components).unwrap();

        assert!(value.get("securitySchemes").is_some());
        assert!(value.get("security_schemes").is_none());
    }

    #[test]
    fn test_parameter_location_rename() {
        let parameter = Parameter {
            name: "limit".to_string(),
            location: "query".to_string(),
            required: false,
            schema: json!({"type": "integer"}),
            description: None,
        };

        let value = serde_json::to_value(parameter).unwrap();

        assert_eq!(value["in"], "query");
    }
}
