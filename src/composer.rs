//! Document composition - the central algorithm of the generator.
//!
//! The composer consumes extracted [`ApiMetadata`] and produces the complete
//! [`OpenApiDocument`]: global info/security/servers, shared components, and
//! one `paths` entry per endpoint URL built method by method. Registration of
//! shared components is idempotent by key; a later write with the same key
//! overwrites rather than duplicates.

use crate::document::{
    Components, Info, License, MediaType, OpenApiDocument, Operation, Parameter, RequestBody,
    ResponseRef, SecurityRequirement, Server, Tag,
};
use crate::error::{Error, Result};
use crate::extractor::{
    ApiMetadata, ContentHandlerDescriptor, EndpointDescriptor, HttpMethod, MethodDoc,
    ModelDescriptor,
};
use crate::interfaces::VersionReporter;
use log::debug;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Static document metadata seeded into the `info` and `servers` sections.
#[derive(Debug, Clone)]
pub struct ComposerSettings {
    /// API title
    pub title: String,
    /// API description
    pub description: Option<String>,
    /// API license
    pub license: Option<License>,
    /// Server list
    pub servers: Vec<Server>,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            title: "REST API Documentation".to_string(),
            description: Some(
                "OpenAPI documentation for every registered API endpoint.".to_string(),
            ),
            license: Some(License {
                name: "Apache-2.0".to_string(),
                url: Some("https://www.apache.org/licenses/LICENSE-2.0.html".to_string()),
            }),
            servers: vec![Server {
                url: "/".to_string(),
                description: Some("This host".to_string()),
            }],
        }
    }
}

/// Builds the OpenAPI document from extracted metadata.
pub struct DocumentComposer {
    settings: ComposerSettings,
    version: String,
}

impl DocumentComposer {
    /// Creates a composer, reading the document version from the reporting
    /// collaborator once.
    pub fn new(settings: ComposerSettings, version_reporter: &dyn VersionReporter) -> Self {
        Self {
            settings,
            version: version_reporter.current_version(),
        }
    }

    /// Composes the full document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedModel`] or [`Error::UnresolvedParentModel`]
    /// when an endpoint references a model that was never registered. Either
    /// is fatal; no partial document is produced.
    pub fn compose(&self, metadata: &ApiMetadata) -> Result<OpenApiDocument> {
        debug!("Composing OpenAPI document, version {}", self.version);

        let mut document = OpenApiDocument {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: self.settings.title.clone(),
                version: self.version.clone(),
                description: self.settings.description.clone(),
                license: self.settings.license.clone(),
            },
            servers: self.settings.servers.clone(),
            security: Vec::new(),
            tags: Vec::new(),
            components: Components::default(),
            paths: BTreeMap::new(),
        };

        for auth in &metadata.auth_methods {
            debug!("Registering security scheme: {}", auth.shortname);
            let mut requirement = SecurityRequirement::new();
            requirement.insert(auth.shortname.clone(), Vec::new());
            document.security.push(requirement);
            document
                .components
                .security_schemes
                .insert(auth.shortname.clone(), auth.scheme.clone());
        }

        for response in &metadata.responses {
            debug!("Registering response component: {}", response.shortname);
            document
                .components
                .responses
                .insert(response.shortname.clone(), response.component.clone());
        }

        for endpoint in &metadata.endpoints {
            debug!("Composing path entry: {}", endpoint.url);

            let model = metadata.models.get(&endpoint.model_name).ok_or_else(|| {
                Error::UnresolvedModel {
                    endpoint: endpoint.url.clone(),
                    model: endpoint.model_name.clone(),
                }
            })?;
            let parent = match &model.parent_model {
                Some(name) => Some(metadata.models.get(name).ok_or_else(|| {
                    Error::UnresolvedParentModel {
                        model: model.name.clone(),
                        parent: name.clone(),
                    }
                })?),
                None => None,
            };

            if let Some(parent) = parent {
                document
                    .components
                    .schemas
                    .insert(parent.name.clone(), parent.schema.clone());
            }
            document
                .components
                .schemas
                .insert(model.name.clone(), model.schema.clone());

            if !document.tags.iter().any(|tag| tag.name == endpoint.tag) {
                document.tags.push(Tag {
                    name: endpoint.tag.clone(),
                });
            }

            let path_item = document.paths.entry(endpoint.url.clone()).or_default();
            for &method in &endpoint.methods {
                let operation = self.build_operation(method, endpoint, model, parent, metadata);
                path_item.set(method, operation);
            }
        }

        Ok(document)
    }

    /// Builds the operation entry for one method on one endpoint.
    fn build_operation(
        &self,
        method: HttpMethod,
        endpoint: &EndpointDescriptor,
        model: &ModelDescriptor,
        parent: Option<&ModelDescriptor>,
        metadata: &ApiMetadata,
    ) -> Operation {
        let doc = endpoint.docs.get(&method).cloned().unwrap_or_default();

        let security = if endpoint.auth_methods.is_empty() {
            None
        } else {
            // Restrict this method to exactly the declared auth methods,
            // overriding the global default.
            Some(
                endpoint
                    .auth_methods
                    .iter()
                    .map(|name| {
                        let mut requirement = SecurityRequirement::new();
                        requirement.insert(name.clone(), Vec::new());
                        requirement
                    })
                    .collect(),
            )
        };

        let parameters = Self::query_parameters(method, endpoint, model, parent);
        let request_body = if method.has_request_body() {
            Some(Self::request_body(
                method,
                endpoint,
                model,
                parent,
                &metadata.content_handlers,
            ))
        } else {
            None
        };

        // Every method advertises the full shared response set.
        let responses = metadata
            .responses
            .iter()
            .map(|response| {
                (
                    response.code.to_string(),
                    ResponseRef {
                        reference: format!("#/components/responses/{}", response.shortname),
                    },
                )
            })
            .collect();

        Operation {
            tags: vec![endpoint.tag.clone()],
            summary: Some(format!(
                "{} {}",
                method.as_str().to_uppercase(),
                endpoint.url
            )),
            description: Some(Self::operation_description(&doc, endpoint, model, parent)),
            operation_id: Some(format!("{}{}", method.as_str(), endpoint.shortname)),
            deprecated: endpoint.deprecated,
            security,
            parameters: if parameters.is_empty() {
                None
            } else {
                Some(parameters)
            },
            request_body,
            responses,
        }
    }

    /// Assembles the operation description from the method's help text and
    /// the endpoint/model attribute summary. Absent optional values render
    /// as the explicit `None` sentinel rather than being omitted.
    fn operation_description(
        doc: &MethodDoc,
        endpoint: &EndpointDescriptor,
        model: &ModelDescriptor,
        parent: Option<&ModelDescriptor>,
    ) -> String {
        let cardinality = if endpoint.many { "Plural" } else { "Singular" };
        let parent_name = parent.map(|p| p.name.as_str()).unwrap_or("None");
        let cache = model.cache_name.as_deref().unwrap_or("None");

        format!(
            "{}\n\nCardinality: {}\nModel: {}\nParent model: {}\nRequires authentication: {}\n\
             Allowed privileges: [{}]\nRequired packages: [{}]\nApplies immediately: {}\nCache: {}",
            doc.help_text,
            cardinality,
            model.name,
            parent_name,
            endpoint.requires_auth,
            doc.privileges.join(", "),
            model.packages.join(", "),
            model.always_apply,
            cache
        )
    }

    /// Builds the request body for `post`/`put`/`patch` methods: an `allOf`
    /// composition of the model reference and locally declared constraints,
    /// negotiated across every decodable content handler.
    fn request_body(
        method: HttpMethod,
        endpoint: &EndpointDescriptor,
        model: &ModelDescriptor,
        parent: Option<&ModelDescriptor>,
        content_handlers: &[ContentHandlerDescriptor],
    ) -> RequestBody {
        let schema = Self::request_body_schema(method, endpoint, model, parent);

        let content = content_handlers
            .iter()
            .filter(|handler| handler.can_decode)
            .map(|handler| {
                (
                    handler.mime_type.clone(),
                    MediaType {
                        schema: schema.clone(),
                    },
                )
            })
            .collect();

        RequestBody { content }
    }

    fn request_body_schema(
        method: HttpMethod,
        endpoint: &EndpointDescriptor,
        model: &ModelDescriptor,
        parent: Option<&ModelDescriptor>,
    ) -> Value {
        let mut all_of = Vec::new();

        // A plural parent nests this model under a specific parent object.
        if parent.is_some_and(|p| p.many) {
            all_of.push(json!({
                "type": "object",
                "required": ["parent_id"],
                "properties": {"parent_id": {"type": "integer"}}
            }));
        }

        all_of.push(json!({
            "$ref": format!("#/components/schemas/{}", model.name)
        }));

        if !model.required_fields.is_empty() {
            all_of.push(json!({
                "type": "object",
                "required": model.required_fields.clone()
            }));
        }

        // Writes to a single object of a collection model must address it by
        // id; creation allocates the id instead.
        if !endpoint.many && model.many && method != HttpMethod::Post {
            all_of.push(json!({
                "type": "object",
                "required": ["id"],
                "properties": {"id": {"type": "integer"}}
            }));
        }

        let composite = json!({ "allOf": all_of });

        if endpoint.many && model.many {
            json!({"type": "array", "items": composite})
        } else {
            composite
        }
    }

    /// Builds the query parameter list for one method.
    fn query_parameters(
        method: HttpMethod,
        endpoint: &EndpointDescriptor,
        model: &ModelDescriptor,
        parent: Option<&ModelDescriptor>,
    ) -> Vec<Parameter> {
        let mut parameters = Vec::new();

        let reads_single_object = !endpoint.many
            && model.many
            && matches!(method, HttpMethod::Get | HttpMethod::Delete);
        if reads_single_object {
            // Query string values arrive untyped, so ids accept either form.
            let id_union = json!({"oneOf": [{"type": "integer"}, {"type": "string"}]});

            if parent.is_some_and(|p| p.many) {
                parameters.push(Parameter {
                    name: "parent_id".to_string(),
                    location: "query".to_string(),
                    required: true,
                    schema: id_union.clone(),
                    description: Some(
                        "The id of the parent object this object nests under.".to_string(),
                    ),
                });
            }

            parameters.push(Parameter {
                name: "id".to_string(),
                location: "query".to_string(),
                required: true,
                schema: id_union,
                description: Some("The id of the object to target.".to_string()),
            });

            if method == HttpMethod::Delete && model.subsystem.is_some() {
                parameters.push(Parameter {
                    name: "apply".to_string(),
                    location: "query".to_string(),
                    required: false,
                    schema: json!({"type": "boolean", "default": false}),
                    description: Some(
                        "Apply the deletion to the configuration immediately.".to_string(),
                    ),
                });
            }
        }

        if endpoint.many && matches!(method, HttpMethod::Get | HttpMethod::Delete) {
            parameters.push(Parameter {
                name: "limit".to_string(),
                location: "query".to_string(),
                required: false,
                schema: json!({"type": "integer", "default": endpoint.limit}),
                description: Some("The maximum number of objects to target.".to_string()),
            });
            parameters.push(Parameter {
                name: "offset".to_string(),
                location: "query".to_string(),
                required: false,
                schema: json!({"type": "integer", "default": endpoint.offset}),
                description: Some("The starting offset of targeted objects.".to_string()),
            });
            parameters.push(Parameter {
                name: "query".to_string(),
                location: "query".to_string(),
                required: false,
                schema: json!({
                    "type": "object",
                    "default": {},
                    "additionalProperties": {"type": "string"}
                }),
                description: Some(
                    "Arbitrary field-value pairs used to filter targeted objects.".to_string(),
                ),
            });
        }

        parameters
    }
}
