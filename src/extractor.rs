//! Metadata extraction for registered class families.
//!
//! Extraction turns each registration into an immutable descriptor value by
//! calling its factory once and reading the attributes declared by the
//! [`crate::interfaces`] traits. Descriptors are plain data: extracting the
//! same registry twice yields identical values, and nothing here mutates
//! global state.
//!
//! A factory that fails to construct its class aborts the whole run; there
//! is no partial-document fallback.

use crate::error::{Error, Result};
use crate::interfaces::{Endpoint, Model};
use crate::registry::Registry;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// HTTP methods an endpoint can declare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// The lower-cased method name used as a `paths` entry key and in
    /// operation ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// True for methods that carry a request body.
    pub fn has_request_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Per-method documentation metadata declared by an endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDoc {
    /// Privileges allowed to call the method, in declaration order.
    pub privileges: Vec<String>,
    /// Human-readable help text for the method.
    pub help_text: String,
}

/// Extracted endpoint metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    /// Short class name, used in operation ids.
    pub shortname: String,
    pub url: String,
    pub tag: String,
    /// Name of the model this endpoint operates on.
    pub model_name: String,
    /// Collection endpoint when true, single-object endpoint otherwise.
    pub many: bool,
    /// Declared methods, in declaration order.
    pub methods: Vec<HttpMethod>,
    /// Privileges and help text per declared method.
    pub docs: BTreeMap<HttpMethod, MethodDoc>,
    /// Auth method restriction; empty means all configured methods apply.
    pub auth_methods: Vec<String>,
    pub deprecated: bool,
    /// Default pagination limit for collection endpoints.
    pub limit: u64,
    /// Default pagination offset for collection endpoints.
    pub offset: u64,
    pub requires_auth: bool,
}

impl EndpointDescriptor {
    fn read(endpoint: &dyn Endpoint, shortname: &str) -> Self {
        let methods = endpoint.request_methods();
        let docs = methods
            .iter()
            .map(|&method| (method, endpoint.method_doc(method)))
            .collect();

        Self {
            shortname: shortname.to_string(),
            url: endpoint.url(),
            tag: endpoint.tag(),
            model_name: endpoint.model_name(),
            many: endpoint.many(),
            methods,
            docs,
            auth_methods: endpoint.auth_methods(),
            deprecated: endpoint.deprecated(),
            limit: endpoint.limit(),
            offset: endpoint.offset(),
            requires_auth: endpoint.requires_auth(),
        }
    }
}

/// Extracted model metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Short class name, also the `components.schemas` key.
    pub name: String,
    /// Collection model when true.
    pub many: bool,
    /// Short name of the parent model this model nests under, if any.
    pub parent_model: Option<String>,
    pub packages: Vec<String>,
    pub always_apply: bool,
    pub cache_name: Option<String>,
    pub subsystem: Option<String>,
    /// The model's JSON schema, registered verbatim.
    pub schema: Value,
    pub required_fields: Vec<String>,
}

impl ModelDescriptor {
    fn read(model: &dyn Model, name: &str) -> Self {
        Self {
            name: name.to_string(),
            many: model.many(),
            parent_model: model.parent_model_name(),
            packages: model.packages(),
            always_apply: model.always_apply(),
            cache_name: model.cache_name(),
            subsystem: model.subsystem(),
            schema: model.openapi_schema(),
            required_fields: model.required_fields(),
        }
    }
}

/// Extracted response metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDescriptor {
    /// Short class name, also the `components.responses` key.
    pub shortname: String,
    /// HTTP status code the response is returned with.
    pub code: u16,
    /// The response component body, registered verbatim.
    pub component: Value,
}

/// Extracted auth method metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthDescriptor {
    /// Short class name, also the `components.securitySchemes` key.
    pub shortname: String,
    /// The OpenAPI security-scheme object, registered verbatim.
    pub scheme: Value,
}

/// Extracted content handler metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentHandlerDescriptor {
    pub mime_type: String,
    pub can_decode: bool,
}

/// Everything one generation run knows about the API surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiMetadata {
    /// Endpoints in registration order.
    pub endpoints: Vec<EndpointDescriptor>,
    /// Models keyed by name for resolution during composition.
    pub models: BTreeMap<String, ModelDescriptor>,
    /// Responses in registration order.
    pub responses: Vec<ResponseDescriptor>,
    /// Auth methods in registration order.
    pub auth_methods: Vec<AuthDescriptor>,
    /// Content handlers in registration order.
    pub content_handlers: Vec<ContentHandlerDescriptor>,
}

/// Instantiates every registered class and snapshots its declared attributes.
///
/// Descriptors are derived fresh on every call; calling twice on the same
/// registry yields equal values.
///
/// # Errors
///
/// Returns [`Error::Extraction`] if any factory fails. The whole run is
/// abandoned on the first failure.
pub fn extract_all(registry: &Registry) -> Result<ApiMetadata> {
    let mut metadata = ApiMetadata::default();

    for registration in registry.endpoints() {
        debug!("Extracting endpoint metadata: {}", registration.name);
        let endpoint = instantiate(&registration.name, &registration.factory)?;
        metadata
            .endpoints
            .push(EndpointDescriptor::read(endpoint.as_ref(), &registration.name));
    }

    for registration in registry.models() {
        debug!("Extracting model metadata: {}", registration.name);
        let model = instantiate(&registration.name, &registration.factory)?;
        let descriptor = ModelDescriptor::read(model.as_ref(), &registration.name);
        // Overwrite on duplicate key; descriptors are derived solely from
        // their source class, so duplicates cannot disagree.
        metadata.models.insert(descriptor.name.clone(), descriptor);
    }

    for registration in registry.responses() {
        debug!("Extracting response metadata: {}", registration.name);
        let response = instantiate(&registration.name, &registration.factory)?;
        metadata.responses.push(ResponseDescriptor {
            shortname: registration.name.clone(),
            code: response.code(),
            component: response.openapi_component(),
        });
    }

    for registration in registry.auth_methods() {
        debug!("Extracting auth method metadata: {}", registration.name);
        let auth = instantiate(&registration.name, &registration.factory)?;
        metadata.auth_methods.push(AuthDescriptor {
            shortname: registration.name.clone(),
            scheme: auth.security_scheme(),
        });
    }

    for registration in registry.content_handlers() {
        debug!("Extracting content handler metadata: {}", registration.name);
        let handler = instantiate(&registration.name, &registration.factory)?;
        metadata.content_handlers.push(ContentHandlerDescriptor {
            mime_type: handler.mime_type(),
            can_decode: handler.can_decode(),
        });
    }

    debug!(
        "Extracted {} endpoints, {} models, {} responses, {} auth methods, {} content handlers",
        metadata.endpoints.len(),
        metadata.models.len(),
        metadata.responses.len(),
        metadata.auth_methods.len(),
        metadata.content_handlers.len()
    );

    Ok(metadata)
}

fn instantiate<T: ?Sized>(
    name: &str,
    factory: &dyn Fn() -> anyhow::Result<Box<T>>,
) -> Result<Box<T>> {
    factory().map_err(|source| Error::Extraction {
        class: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct RuleEndpoint;

    impl Endpoint for RuleEndpoint {
        fn url(&self) -> String {
            "/api/v2/firewall/rule".to_string()
        }

        fn tag(&self) -> String {
            "FIREWALL".to_string()
        }

        fn model_name(&self) -> String {
            "FirewallRule".to_string()
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
                    help_text: "Creates a firewall rule.".to_string(),
                },
            }
        }

        fn limit(&self) -> u64 {
            100
        }
    }

    struct RuleModel;

    impl Model for RuleModel {
        fn many(&self) -> bool {
            true
        }

        fn required_fields(&self) -> Vec<String> {
            vec!["type".to_string(), "interface".to_string()]
        }

        fn openapi_schema(&self) -> Value {
            json!({"type": "object", "properties": {"type": {"type": "string"}}})
        }
    }

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_endpoint("FirewallRuleEndpoint", || Ok(Box::new(RuleEndpoint)));
        registry.register_model("FirewallRule", || Ok(Box::new(RuleModel)));
        registry
    }

    #[test]
    fn test_extract_endpoint_descriptor() {
        let metadata = extract_all(&sample_registry()).unwrap();

        assert_eq!(metadata.endpoints.len(), 1);
        let endpoint = &metadata.endpoints[0];
        assert_eq!(endpoint.shortname, "FirewallRuleEndpoint");
        assert_eq!(endpoint.url, "/api/v2/firewall/rule");
        assert_eq!(endpoint.methods, vec![HttpMethod::Get, HttpMethod::Post]);
        assert_eq!(endpoint.limit, 100);
        assert_eq!(endpoint.offset, 0);
        assert!(endpoint.requires_auth);
        assert!(!endpoint.deprecated);

        let get_doc = &endpoint.docs[&HttpMethod::Get];
        assert_eq!(get_doc.privileges, vec!["page-firewall-rules"]);
        assert_eq!(get_doc.help_text, "Reads firewall rules.");
    }

    #[test]
    fn test_extract_model_descriptor() {
        let metadata = extract_all(&sample_registry()).unwrap();

        let model = &metadata.models["FirewallRule"];
        assert!(model.many);
        assert_eq!(model.parent_model, None);
        assert_eq!(
            model.required_fields,
            vec!["type".to_string(), "interface".to_string()]
        );
        assert_eq!(model.schema["type"], "object");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let registry = sample_registry();

        let first = extract_all(&registry).unwrap();
        let second = extract_all(&registry).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_factory_failure_is_fatal() {
        let mut registry = sample_registry();
        registry.register_endpoint("BrokenEndpoint", || {
            anyhow::bail!("package pfSense-pkg-WireGuard is not installed")
        });

        let err = extract_all(&registry).unwrap_err();

        match err {
            Error::Extraction { class, .. } => assert_eq!(class, "BrokenEndpoint"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_http_method_strings() {
        assert_eq!(HttpMethod::Get.as_str(), "get");
        assert_eq!(HttpMethod::Delete.as_str(), "delete");
        assert!(HttpMethod::Post.has_request_body());
        assert!(HttpMethod::Patch.has_request_body());
        assert!(!HttpMethod::Get.has_request_body());
        assert!(!HttpMethod::Delete.has_request_body());
    }
}
