//! OpenAPI document and Swagger UI.

use axum::{response::Html, routing::get, Json, Router};
use serde_json::{json, Value};

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>TODO API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/swagger/doc.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// Routes serving the API description.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/swagger/doc.json", get(doc_json))
        .route("/swagger/", get(swagger_ui))
        .route("/swagger/index.html", get(swagger_ui))
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

async fn doc_json() -> Json<Value> {
    Json(openapi())
}

fn error_response(description: &str) -> Value {
    json!({ "description": description, "schema": { "type": "string" } })
}

fn id_param() -> Value {
    json!({ "type": "integer", "description": "Todo ID", "name": "id", "in": "path", "required": true })
}

/// Swagger 2.0 description of the todo API.
pub fn openapi() -> Value {
    json!({
        "swagger": "2.0",
        "info": {
            "title": "TODO API",
            "description": "A Simple TODO API based on PostgreSQL",
            "version": env!("CARGO_PKG_VERSION"),
            "license": {
                "name": "Apache 2.0",
                "url": "http://www.apache.org/licenses/LICENSE-2.0.html"
            }
        },
        "basePath": "/api/v1",
        "paths": {
            "/todos": { "get": list_todos(), "post": add_todo() },
            "/todos/{id}": { "get": get_todo(), "put": update_todo(), "delete": delete_todo() }
        },
        "definitions": definitions()
    })
}

fn list_todos() -> Value {
    json!({
        "summary": "List all todos",
        "produces": ["application/json"],
        "tags": ["todos"],
        "responses": {
            "200": {
                "description": "OK",
                "schema": { "type": "array", "items": { "$ref": "#/definitions/models.Todo" } }
            },
            "500": error_response("Internal Server Error")
        }
    })
}

fn add_todo() -> Value {
    json!({
        "summary": "Add a new todo",
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "tags": ["todos"],
        "parameters": [body_param("todo", "Add todo", "models.Base")],
        "responses": {
            "201": { "description": "Created", "schema": { "$ref": "#/definitions/models.Todo" } },
            "400": error_response("Bad Request"),
            "500": error_response("Internal Server Error")
        }
    })
}

fn get_todo() -> Value {
    json!({
        "summary": "Get a todo",
        "produces": ["application/json"],
        "tags": ["todos"],
        "parameters": [id_param()],
        "responses": {
            "200": { "description": "OK", "schema": { "$ref": "#/definitions/models.Todo" } },
            "403": error_response("Forbidden"),
            "404": error_response("Not Found"),
            "500": error_response("Internal Server Error")
        }
    })
}

fn update_todo() -> Value {
    json!({
        "summary": "Update the status of a todo",
        "consumes": ["application/json"],
        "tags": ["todos"],
        "parameters": [id_param(), body_param("status", "Todo status", "models.Status")],
        "responses": {
            "204": { "description": "No Content" },
            "400": error_response("Bad Request"),
            "403": error_response("Forbidden"),
            "404": error_response("Not Found"),
            "500": error_response("Internal Server Error")
        }
    })
}

fn delete_todo() -> Value {
    json!({
        "summary": "Delete a todo",
        "tags": ["todos"],
        "parameters": [id_param()],
        "responses": {
            "204": { "description": "No Content" },
            "403": error_response("Forbidden"),
            "404": error_response("Not Found"),
            "500": error_response("Internal Server Error")
        }
    })
}

fn body_param(name: &str, description: &str, definition: &str) -> Value {
    json!({
        "description": description,
        "name": name,
        "in": "body",
        "required": true,
        "schema": { "$ref": format!("#/definitions/{}", definition) }
    })
}

fn definitions() -> Value {
    json!({
        "models.Base": {
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "description": { "type": "string" },
                "priority": { "type": "integer" }
            }
        },
        "models.Status": {
            "type": "object",
            "properties": { "completed": { "type": "boolean" } }
        },
        "models.Todo": {
            "type": "object",
            "properties": {
                "id": { "type": "integer" },
                "title": { "type": "string" },
                "description": { "type": "string" },
                "priority": { "type": "integer" },
                "completed": { "type": "boolean" },
                "created_at": { "type": "string", "format": "date-time" },
                "updated_at": { "type": "string", "format": "date-time" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_operation() {
        let doc = openapi();
        let todos = &doc["paths"]["/todos"];
        let by_id = &doc["paths"]["/todos/{id}"];

        assert!(todos["get"].is_object());
        assert!(todos["post"].is_object());
        for method in ["get", "put", "delete"] {
            assert!(by_id[method].is_object(), "missing {}", method);
        }
        assert_eq!(doc["basePath"], "/api/v1");
    }
}
