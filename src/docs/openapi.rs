// Start of file: /src/docs/openapi.rs

use once_cell::sync::Lazy;
use serde_json::{json, Value};

// * The API description served at /v2/api-docs. Built once, lazily;
// * the document only changes when the routes do.
static DOCUMENT: Lazy<Value> = Lazy::new(|| {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Movement Automation Demo API",
            "description": "REST demonstration service",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/test": {
                "get": {
                    "summary": "Returns the demo item",
                    "responses": {
                        "200": {
                            "description": "The fixed demo record",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Item" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Item": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int32" },
                        "name": { "type": "string" }
                    },
                    "required": ["id", "name"]
                }
            }
        }
    })
});

pub fn document() -> &'static Value {
    &DOCUMENT
}


// End of file: /src/docs/openapi.rs
