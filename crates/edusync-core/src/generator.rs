//! Description document generator.
//!
//! Builds the Swagger 2.0 document for every EduSync route from a static route
//! table. `host` and `schemes` are left empty; they are filled per request when the
//! document is served.

use serde_json::{Map, Value, json};

use crate::document::{ApiDocument, ApiInfo};
use crate::models::Collection;

pub const API_TITLE: &str = "EduSync API";
pub const API_DESCRIPTION: &str = "API for managing a school's student information system. \
     It allows authenticated staff to manage student records, courses, and enrollments.";
pub const API_VERSION: &str = "1.0.0";

/// Name of the bearer token security definition.
const BEARER_AUTH: &str = "bearerAuth";

/// One operation in the route table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSpec {
    /// Lowercase HTTP method.
    pub method: &'static str,
    /// Path template in Swagger form (`/students/{id}`).
    pub path: String,
    pub tag: &'static str,
    pub summary: String,
    /// Swagger parameter objects, excluding the body.
    pub parameters: Vec<Value>,
    /// `(status, description)` pairs.
    pub responses: Vec<(u16, &'static str)>,
    /// Definition name for a JSON body parameter.
    pub body_schema: Option<&'static str>,
    /// Whether the operation requires an authenticated caller.
    pub secured: bool,
}

impl RouteSpec {
    fn new(method: &'static str, path: impl Into<String>, tag: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            tag,
            summary: String::new(),
            parameters: Vec::new(),
            responses: Vec::new(),
            body_schema: None,
            secured: false,
        }
    }

    fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    fn id_param(mut self) -> Self {
        self.parameters.push(json!({
            "name": "id",
            "in": "path",
            "required": true,
            "type": "string",
            "format": "uuid"
        }));
        self
    }

    fn query_param(mut self, name: &str) -> Self {
        self.parameters.push(json!({
            "name": name,
            "in": "query",
            "type": "string"
        }));
        self
    }

    fn response(mut self, status: u16, description: &'static str) -> Self {
        self.responses.push((status, description));
        self
    }

    fn body(mut self, schema: &'static str) -> Self {
        self.body_schema = Some(schema);
        self
    }

    fn secured(mut self) -> Self {
        self.secured = true;
        self
    }

    fn operation(&self) -> Value {
        let mut parameters = self.parameters.clone();
        if let Some(schema) = self.body_schema {
            parameters.push(json!({
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {"$ref": format!("#/definitions/{schema}")}
            }));
        }

        let responses: Map<String, Value> = self
            .responses
            .iter()
            .map(|(status, description)| {
                (status.to_string(), json!({ "description": description }))
            })
            .collect();

        let mut op = json!({
            "tags": [self.tag],
            "summary": self.summary,
            "parameters": parameters,
            "responses": responses,
        });
        if self.body_schema.is_some() {
            op["consumes"] = json!(["application/json"]);
        }
        if self.secured {
            op["security"] = json!([{ BEARER_AUTH: [] }]);
        }
        op
    }
}

/// Routes served by the EduSync server, in registration order.
pub fn edusync_routes() -> Vec<RouteSpec> {
    let mut routes = vec![
        RouteSpec::new("get", "/", "Session")
            .summary("Show the current login state")
            .response(200, "Logged in as <name>, or Logged Out"),
        RouteSpec::new("get", "/github", "Session")
            .summary("Start GitHub login")
            .response(303, "Redirect to GitHub"),
        RouteSpec::new("get", "/github/callback", "Session")
            .summary("GitHub OAuth callback")
            .query_param("code")
            .response(303, "Redirect to /"),
        RouteSpec::new("get", "/logout", "Session")
            .summary("End the current session")
            .response(303, "Redirect to /")
            .response(500, "Error logging out"),
        RouteSpec::new("get", "/auth/token", "Session")
            .summary("Issue a bearer token for the logged-in user")
            .response(200, "Token issued")
            .response(401, "Not logged in"),
        RouteSpec::new("get", "/health", "Health")
            .summary("Liveness check")
            .response(200, "Service is up"),
        RouteSpec::new("get", "/health/ready", "Health")
            .summary("Readiness check including the datastore")
            .response(200, "Ready")
            .response(503, "Datastore unavailable"),
    ];

    for collection in Collection::ALL {
        let name = collection.as_str();
        let noun = collection.singular();
        let tag = collection.tag();
        let schema = collection.tag().trim_end_matches('s');
        let list = format!("/{name}");
        let item = format!("/{name}/{{id}}");

        routes.push(
            RouteSpec::new("get", list.clone(), tag)
                .summary(format!("List all {name}"))
                .response(200, "OK"),
        );
        routes.push(
            RouteSpec::new("post", list, tag)
                .summary(format!("Create a {noun}"))
                .body(schema)
                .secured()
                .response(201, "Created")
                .response(400, "Invalid payload")
                .response(401, "Not authenticated"),
        );
        routes.push(
            RouteSpec::new("get", item.clone(), tag)
                .summary(format!("Get a {noun} by id"))
                .id_param()
                .response(200, "OK")
                .response(400, "Malformed id")
                .response(404, "Not found"),
        );
        routes.push(
            RouteSpec::new("put", item.clone(), tag)
                .summary(format!("Update a {noun}"))
                .id_param()
                .body(schema)
                .secured()
                .response(200, "Updated")
                .response(400, "Invalid payload")
                .response(401, "Not authenticated")
                .response(404, "Not found"),
        );
        routes.push(
            RouteSpec::new("delete", item, tag)
                .summary(format!("Delete a {noun}"))
                .id_param()
                .secured()
                .response(200, "Deleted")
                .response(401, "Not authenticated")
                .response(404, "Not found"),
        );
    }

    routes
}

fn definitions() -> Value {
    json!({
        "Student": {
            "type": "object",
            "required": ["name", "email"],
            "properties": {
                "name": {"type": "string", "example": "Jane Doe"},
                "email": {"type": "string", "example": "jane@school.com"}
            }
        },
        "User": {
            "type": "object",
            "required": ["username", "password"],
            "properties": {
                "username": {"type": "string", "example": "registrar"},
                "password": {"type": "string", "minLength": 8}
            }
        },
        "Course": {
            "type": "object",
            "required": ["name", "code"],
            "properties": {
                "name": {"type": "string", "example": "Algebra I"},
                "code": {"type": "string", "example": "MATH-101"}
            }
        },
        "Enrollment": {
            "type": "object",
            "required": ["studentId", "courseId"],
            "properties": {
                "studentId": {"type": "string"},
                "courseId": {"type": "string"},
                "status": {"type": "string", "enum": ["active", "completed", "dropped"]}
            }
        }
    })
}

/// Build a document for the given routes.
pub fn generate_document(info: ApiInfo, routes: &[RouteSpec]) -> ApiDocument {
    let mut paths = Map::new();
    for route in routes {
        let entry = paths
            .entry(route.path.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(route.method.to_string(), route.operation());
        }
    }

    let mut extra = Map::new();
    extra.insert(
        "securityDefinitions".to_string(),
        json!({
            BEARER_AUTH: {
                "type": "apiKey",
                "in": "header",
                "name": "Authorization",
                "description": "Bearer token from GET /auth/token"
            }
        }),
    );
    extra.insert("definitions".to_string(), definitions());

    ApiDocument {
        swagger: "2.0".to_string(),
        info,
        host: String::new(),
        schemes: Vec::new(),
        base_path: "/".to_string(),
        paths,
        extra,
    }
}

/// The EduSync description document.
pub fn edusync_document() -> ApiDocument {
    let info = ApiInfo {
        title: API_TITLE.to_string(),
        description: API_DESCRIPTION.to_string(),
        version: API_VERSION.to_string(),
    };
    generate_document(info, &edusync_routes())
}
