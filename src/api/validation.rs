use actix_web::HttpResponse;
use serde::Serialize;

/// Error body shared by every endpoint: `{ ok: false, message, fields? }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(message: impl Into<String>, fields: serde_json::Value) -> Self {
        Self {
            ok: false,
            message: message.into(),
            fields: Some(fields),
        }
    }
}

fn bad_request(error_response: ErrorResponse) -> actix_web::Error {
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(error_response))
        .into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let mut fields = serde_json::Map::new();

        match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                for (field, errors) in validation_errors.field_errors() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Validation error in field: {}", field))
                        })
                        .collect();
                    fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
                }

                bad_request(ErrorResponse::with_fields(
                    "Validation failed",
                    serde_json::Value::Object(fields),
                ))
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                let message = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload"
                } else if err_string.contains("invalid type") {
                    "Invalid value type. Check the expected type for this field"
                } else {
                    "Invalid JSON format"
                };
                fields.insert("message".to_string(), serde_json::json!(message));

                bad_request(ErrorResponse::with_fields(
                    "Request validation failed",
                    serde_json::Value::Object(fields),
                ))
            }
            _ => bad_request(ErrorResponse::new("Validation failed")),
        }
    })
}

/// Query-string counterpart of [`json_config`]
pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(|err, _req| {
        let mut fields = serde_json::Map::new();
        fields.insert("message".to_string(), serde_json::json!(err.to_string()));
        bad_request(ErrorResponse::with_fields(
            "Invalid query parameters",
            serde_json::Value::Object(fields),
        ))
    })
}
