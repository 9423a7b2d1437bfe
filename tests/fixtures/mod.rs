//! Sample class implementations exercising the full generation pipeline.

use openapi_docgen::extractor::{HttpMethod, MethodDoc};
use openapi_docgen::interfaces::{
    AuthMethod, ContentHandler, Endpoint, Model, Response, VersionReporter,
};
use openapi_docgen::registry::Registry;
use serde_json::{json, Value};

pub struct FirewallRuleEndpoint;

impl Endpoint for FirewallRuleEndpoint {
    fn url(&self) -> String {
        "/api/v2/firewall/rule".to_string()
    }

    fn tag(&self) -> String {
        "FIREWALL".to_string()
    }

    fn model_name(&self) -> String {
        "FirewallRule".to_string()
    }

    fn many(&self) -> bool {
        true
    }

    fn request_methods(&self) -> Vec<HttpMethod> {
        vec![HttpMethod::Get, HttpMethod::Post]
    }

    fn method_doc(&self, method: HttpMethod) -> MethodDoc {
        match method {
            HttpMethod::Get => MethodDoc {
                privileges: vec!["page-firewall-rules".to_string()],
                help_text: "Reads firewall rules.".to_string(),
            },
            _ => MethodDoc {
                privileges: vec!["page-firewall-rules-edit".to_string()],
                help_text: "Creates firewall rules.".to_string(),
            },
        }
    }

    fn limit(&self) -> u64 {
        100
    }
}

pub struct FirewallRule;

impl Model for FirewallRule {
    fn many(&self) -> bool {
        true
    }

    fn required_fields(&self) -> Vec<String> {
        vec!["type".to_string(), "interface".to_string()]
    }

    fn openapi_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {"type": "string"},
                "interface": {"type": "string"},
                "descr": {"type": "string"}
            }
        })
    }
}

pub struct Success;

impl Response for Success {
    fn code(&self) -> u16 {
        200
    }

    fn openapi_component(&self) -> Value {
        json!({
            "description": "The request was successful.",
            "content": {
                "application/json": {
                    "schema": {"type": "object"}
                }
            }
        })
    }
}

pub struct BasicAuth;

impl AuthMethod for BasicAuth {
    fn security_scheme(&self) -> Value {
        json!({"type": "http", "scheme": "basic"})
    }
}

pub struct JsonContentHandler;

impl ContentHandler for JsonContentHandler {
    fn mime_type(&self) -> String {
        "application/json".to_string()
    }

    fn can_decode(&self) -> bool {
        true
    }
}

pub struct FixedVersionReporter;

impl VersionReporter for FixedVersionReporter {
    fn current_version(&self) -> String {
        "2.0.0".to_string()
    }
}

/// Builds a registry containing one of every class family.
pub fn sample_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_endpoint("FirewallRuleEndpoint", || Ok(Box::new(FirewallRuleEndpoint)));
    registry.register_model("FirewallRule", || Ok(Box::new(FirewallRule)));
    registry.register_response("Success", || Ok(Box::new(Success)));
    registry.register_auth_method("BasicAuth", || Ok(Box::new(BasicAuth)));
    registry.register_content_handler("JsonContentHandler", || Ok(Box::new(JsonContentHandler)));
    registry
}
