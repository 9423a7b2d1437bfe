//! Capability interfaces for the class families the generator consumes.
//!
//! The generator never inspects concrete types; it only reads the attributes
//! declared by these traits. The surrounding system implements them on its
//! endpoint, model, response, auth method and content handler classes, then
//! registers factories for them in a [`crate::registry::Registry`].
//!
//! Default method bodies mirror the conventional base-class defaults so an
//! implementation only overrides what it actually declares.

use crate::extractor::{HttpMethod, MethodDoc};
use serde_json::Value;

/// A routable HTTP endpoint: a URL, the methods it supports, and the
/// per-method documentation metadata.
pub trait Endpoint {
    /// The URL path this endpoint is served at (e.g. `/api/v2/firewall/rule`).
    fn url(&self) -> String;

    /// Grouping label for the document's tag list.
    fn tag(&self) -> String;

    /// Name of the model this endpoint operates on. Must match a registered
    /// model's short name.
    fn model_name(&self) -> String;

    /// Whether this endpoint addresses a collection (`true`) or a single
    /// object (`false`).
    fn many(&self) -> bool {
        false
    }

    /// The HTTP methods this endpoint supports, in declaration order.
    fn request_methods(&self) -> Vec<HttpMethod>;

    /// Privileges and help text for one declared method.
    fn method_doc(&self, method: HttpMethod) -> MethodDoc;

    /// Auth method short names this endpoint is restricted to. Empty means
    /// every configured auth method applies.
    fn auth_methods(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the endpoint is marked deprecated.
    fn deprecated(&self) -> bool {
        false
    }

    /// Default pagination limit, used only on collection endpoints.
    fn limit(&self) -> u64 {
        0
    }

    /// Default pagination offset, used only on collection endpoints.
    fn offset(&self) -> u64 {
        0
    }

    /// Whether requests to this endpoint must authenticate.
    fn requires_auth(&self) -> bool {
        true
    }
}

/// A structured resource definition associated with one or more endpoints.
pub trait Model {
    /// Whether the model represents a collection of objects.
    fn many(&self) -> bool {
        false
    }

    /// Short name of the parent model this model nests under, if any.
    fn parent_model_name(&self) -> Option<String> {
        None
    }

    /// System packages that must be installed for this model to function.
    fn packages(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether changes to this model are applied immediately rather than
    /// staged.
    fn always_apply(&self) -> bool {
        false
    }

    /// Name of the cache backing this model, if any.
    fn cache_name(&self) -> Option<String> {
        None
    }

    /// Change-application subsystem this model writes to, if any. Its
    /// presence enables the `apply` query parameter on deletes.
    fn subsystem(&self) -> Option<String> {
        None
    }

    /// Field names that are required when creating or updating this model,
    /// in declaration order.
    fn required_fields(&self) -> Vec<String>;

    /// The model's JSON-schema representation, registered verbatim under
    /// `components.schemas`.
    fn openapi_schema(&self) -> Value;
}

/// A possible error or success response shared by every operation.
pub trait Response {
    /// The HTTP status code this response is returned with.
    fn code(&self) -> u16;

    /// The response component body, registered verbatim under
    /// `components.responses`.
    fn openapi_component(&self) -> Value;
}

/// An authentication scheme the API accepts.
pub trait AuthMethod {
    /// The OpenAPI security-scheme object, registered verbatim under
    /// `components.securitySchemes`.
    fn security_scheme(&self) -> Value;
}

/// A supported request/response media type.
pub trait ContentHandler {
    /// The MIME type this handler negotiates (e.g. `application/json`).
    fn mime_type(&self) -> String;

    /// Whether this handler can decode request bodies. Only decodable
    /// handlers participate in request-body content negotiation.
    fn can_decode(&self) -> bool {
        false
    }
}

/// Reports the running system's version for the document's `info.version`.
pub trait VersionReporter {
    /// The current version value (e.g. `2.0.0`).
    fn current_version(&self) -> String;
}
