//! Explicit registration of the class families the generator consumes.
//!
//! The surrounding system collects its endpoint, model, response, auth
//! method and content handler implementations into a [`Registry`] at startup.
//! Each registration pairs a short class name with a factory closure that
//! instantiates the class with its minimal constructor arguments; the
//! generator calls the factory once per run when extracting metadata.
//!
//! Discovery is a pure registry enumeration: [`Registry::class_names`] maps a
//! namespace-like path to the ordered registration names for that family, in
//! either short or fully-qualified form. Nothing here touches the filesystem
//! or instantiates a class.

use crate::interfaces::{AuthMethod, ContentHandler, Endpoint, Model, Response};
use anyhow::Result;
use log::debug;

/// Namespace under which endpoint classes are discovered.
pub const ENDPOINT_NAMESPACE: &str = "endpoints";
/// Namespace under which model classes are discovered.
pub const MODEL_NAMESPACE: &str = "models";
/// Namespace under which response classes are discovered.
pub const RESPONSE_NAMESPACE: &str = "responses";
/// Namespace under which auth method classes are discovered.
pub const AUTH_NAMESPACE: &str = "auth";
/// Namespace under which content handler classes are discovered.
pub const CONTENT_HANDLER_NAMESPACE: &str = "content_handlers";

/// Factory producing a fresh endpoint instance.
pub type EndpointFactory = Box<dyn Fn() -> Result<Box<dyn Endpoint>>>;
/// Factory producing a fresh model instance.
pub type ModelFactory = Box<dyn Fn() -> Result<Box<dyn Model>>>;
/// Factory producing a fresh response instance, constructed with a
/// representative empty message and identifier.
pub type ResponseFactory = Box<dyn Fn() -> Result<Box<dyn Response>>>;
/// Factory producing a fresh auth method instance.
pub type AuthMethodFactory = Box<dyn Fn() -> Result<Box<dyn AuthMethod>>>;
/// Factory producing a fresh content handler instance.
pub type ContentHandlerFactory = Box<dyn Fn() -> Result<Box<dyn ContentHandler>>>;

/// A named registration for one class in a family.
pub struct Registration<F> {
    /// Short class name (unqualified identifier).
    pub name: String,
    /// Constructor for a representative instance.
    pub factory: F,
}

/// Registry of every class the generator knows about, per family, in
/// registration order.
#[derive(Default)]
pub struct Registry {
    endpoints: Vec<Registration<EndpointFactory>>,
    models: Vec<Registration<ModelFactory>>,
    responses: Vec<Registration<ResponseFactory>>,
    auth_methods: Vec<Registration<AuthMethodFactory>>,
    content_handlers: Vec<Registration<ContentHandlerFactory>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint class under its short name.
    pub fn register_endpoint<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Endpoint>> + 'static,
    {
        let name = name.into();
        debug!("Registering endpoint class: {}", name);
        self.endpoints.push(Registration {
            name,
            factory: Box::new(factory),
        });
    }

    /// Registers a model class under its short name.
    pub fn register_model<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Model>> + 'static,
    {
        let name = name.into();
        debug!("Registering model class: {}", name);
        self.models.push(Registration {
            name,
            factory: Box::new(factory),
        });
    }

    /// Registers a response class under its short name.
    pub fn register_response<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Response>> + 'static,
    {
        let name = name.into();
        debug!("Registering response class: {}", name);
        self.responses.push(Registration {
            name,
            factory: Box::new(factory),
        });
    }

    /// Registers an auth method class under its short name.
    pub fn register_auth_method<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn AuthMethod>> + 'static,
    {
        let name = name.into();
        debug!("Registering auth method class: {}", name);
        self.auth_methods.push(Registration {
            name,
            factory: Box::new(factory),
        });
    }

    /// Registers a content handler class under its short name.
    pub fn register_content_handler<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn ContentHandler>> + 'static,
    {
        let name = name.into();
        debug!("Registering content handler class: {}", name);
        self.content_handlers.push(Registration {
            name,
            factory: Box::new(factory),
        });
    }

    /// Lists the class identifiers registered under a namespace, in
    /// registration order.
    ///
    /// The namespace is matched case-insensitively and tolerates leading or
    /// trailing `/` and `\` separators, so `"endpoints"`, `"/endpoints/"`
    /// and `"\Endpoints\"` all address the same family. An unknown namespace
    /// yields an empty list, never an error.
    ///
    /// With `fully_qualified` set, each identifier is prefixed with its
    /// canonical namespace (`endpoints/FirewallRuleEndpoint`); otherwise the
    /// short name is returned.
    pub fn class_names(&self, namespace: &str, fully_qualified: bool) -> Vec<String> {
        let normalized = Self::normalize_namespace(namespace);

        let (canonical, names): (&str, Vec<&str>) = match normalized.as_str() {
            ENDPOINT_NAMESPACE => (
                ENDPOINT_NAMESPACE,
                self.endpoints.iter().map(|r| r.name.as_str()).collect(),
            ),
            MODEL_NAMESPACE => (
                MODEL_NAMESPACE,
                self.models.iter().map(|r| r.name.as_str()).collect(),
            ),
            RESPONSE_NAMESPACE => (
                RESPONSE_NAMESPACE,
                self.responses.iter().map(|r| r.name.as_str()).collect(),
            ),
            AUTH_NAMESPACE => (
                AUTH_NAMESPACE,
                self.auth_methods.iter().map(|r| r.name.as_str()).collect(),
            ),
            CONTENT_HANDLER_NAMESPACE => (
                CONTENT_HANDLER_NAMESPACE,
                self.content_handlers
                    .iter()
                    .map(|r| r.name.as_str())
                    .collect(),
            ),
            _ => {
                debug!("Unknown namespace: {}", namespace);
                return Vec::new();
            }
        };

        names
            .into_iter()
            .map(|name| {
                if fully_qualified {
                    format!("{}/{}", canonical, name)
                } else {
                    name.to_string()
                }
            })
            .collect()
    }

    /// Strip separator variations and case so namespace lookups are lenient.
    fn normalize_namespace(namespace: &str) -> String {
        namespace
            .trim_matches(|c| c == '/' || c == '\\')
            .to_ascii_lowercase()
    }

    /// True when no class of any family has been registered.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
            && self.models.is_empty()
            && self.responses.is_empty()
            && self.auth_methods.is_empty()
            && self.content_handlers.is_empty()
    }

    pub(crate) fn endpoints(&self) -> &[Registration<EndpointFactory>] {
        &self.endpoints
    }

    pub(crate) fn models(&self) -> &[Registration<ModelFactory>] {
        &self.models
    }

    pub(crate) fn responses(&self) -> &[Registration<ResponseFactory>] {
        &self.responses
    }

    pub(crate) fn auth_methods(&self) -> &[Registration<AuthMethodFactory>] {
        &self.auth_methods
    }

    pub(crate) fn content_handlers(&self) -> &[Registration<ContentHandlerFactory>] {
        &self.content_handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{HttpMethod, MethodDoc};

    struct DummyEndpoint;

    impl Endpoint for DummyEndpoint {
        fn url(&self) -> String {
            "/api/v2/dummy".to_string()
        }

        fn tag(&self) -> String {
            "DUMMY".to_string()
        }

        fn model_name(&self) -> String {
            "Dummy".to_string()
        }

        fn request_methods(&self) -> Vec<HttpMethod> {
            vec![HttpMethod::Get]
        }

        fn method_doc(&self, _method: HttpMethod) -> MethodDoc {
            MethodDoc::default()
        }
    }

    fn registry_with_endpoints(names: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for name in names {
            registry.register_endpoint(*name, || Ok(Box::new(DummyEndpoint)));
        }
        registry
    }

    #[test]
    fn test_class_names_preserves_registration_order() {
        let registry =
            registry_with_endpoints(&["SystemHostnameEndpoint", "FirewallRuleEndpoint"]);

        let names = registry.class_names("endpoints", false);

        assert_eq!(
            names,
            vec!["SystemHostnameEndpoint", "FirewallRuleEndpoint"]
        );
    }

    #[test]
    fn test_class_names_fully_qualified() {
        let registry = registry_with_endpoints(&["FirewallRuleEndpoint"]);

        let names = registry.class_names("endpoints", true);

        assert_eq!(names, vec!["endpoints/FirewallRuleEndpoint"]);
    }

    #[test]
    fn test_class_names_tolerates_separator_variations() {
        let registry = registry_with_endpoints(&["FirewallRuleEndpoint"]);

        for namespace in ["/endpoints", "endpoints/", "/endpoints/", "\\Endpoints\\"] {
            let names = registry.class_names(namespace, false);
            assert_eq!(names, vec!["FirewallRuleEndpoint"], "namespace: {}", namespace);
        }
    }

    #[test]
    fn test_unknown_namespace_yields_empty_list() {
        let registry = registry_with_endpoints(&["FirewallRuleEndpoint"]);

        let names = registry.class_names("widgets", false);

        assert!(names.is_empty());
    }

    #[test]
    fn test_empty_family_yields_empty_list() {
        let registry = Registry::new();

        assert!(registry.class_names("models", false).is_empty());
        assert!(registry.is_empty());
    }
}
