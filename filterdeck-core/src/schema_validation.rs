use serde_json::Value;

/// Validate data against JSON Schema
/// Returns Ok(()) if valid, Err with list of validation errors if invalid
pub fn validate_against_schema(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let compiled = jsonschema::validator_for(schema)
        .map_err(|e| vec![format!("Schema compilation error: {}", e)])?;

    let errors: Vec<String> = compiled
        .iter_errors(data)
        .map(|error| {
            let path = error.instance_path.to_string();
            let location = if path.is_empty() { "root".to_string() } else { path };
            format!("{} at {}", error, location)
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": {
                "name": {"type": "string", "minLength": 1},
                "count": {"type": "integer"}
            },
            "required": ["name"]
        })
    }

    #[test]
    fn test_valid_data_passes() {
        assert!(validate_against_schema(&schema(), &json!({"name": "Daily", "count": 2})).is_ok());
    }

    #[test]
    fn test_every_violation_reported() {
        let errors = validate_against_schema(&schema(), &json!({"name": "", "count": "two"})).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("/count")));
    }

    #[test]
    fn test_missing_required_reported_at_root() {
        let errors = validate_against_schema(&schema(), &json!({})).unwrap_err();
        assert!(errors[0].ends_with("at root"));
    }
}
