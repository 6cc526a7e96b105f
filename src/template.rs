use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use crate::document::Document;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("empty template")]
    Empty,

    #[error("template is neither JSON ({json}) nor YAML ({yaml})")]
    Unparsable {
        json: serde_json::Error,
        yaml: serde_yaml::Error,
    },
}

/// Parses a template body whose format is not known up front.
///
/// JSON is tried first since `GetTemplate` returns JSON for most stacks; YAML
/// is the fallback.
pub fn parse(raw: &str) -> Result<Document, TemplateError> {
    if raw.trim().is_empty() {
        return Err(TemplateError::Empty);
    }

    let json = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => return Ok(Document::from(value)),
        Err(err) => err,
    };
    trace!("template is not JSON: {json}");

    match serde_yaml::from_str::<serde_yaml::Value>(raw) {
        Ok(value) => Ok(Document::from(value)),
        Err(yaml) => Err(TemplateError::Unparsable { json, yaml }),
    }
}

/// The `Resources` section, when present and shaped as a map.
pub fn resources(template: &Document) -> Option<&BTreeMap<String, Document>> {
    template.get("Resources")?.as_map()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_TEMPLATE: &str = r#"{
        "AWSTemplateFormatVersion": "2010-09-09",
        "Resources": {
            "Logs": {"Type": "AWS::S3::Bucket", "Properties": {"BucketName": "logs"}}
        }
    }"#;

    const YAML_TEMPLATE: &str = "
AWSTemplateFormatVersion: '2010-09-09'
Resources:
  Logs:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: logs
";

    #[test]
    fn parses_json() {
        let doc = parse(JSON_TEMPLATE).unwrap();
        let value: serde_json::Value = serde_json::from_str(JSON_TEMPLATE).unwrap();
        assert_eq!(doc, Document::from(value));
    }

    #[test]
    fn falls_back_to_yaml() {
        let doc = parse(YAML_TEMPLATE).unwrap();
        assert_eq!(doc, parse(JSON_TEMPLATE).unwrap());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse(""), Err(TemplateError::Empty)));
        assert!(matches!(parse("  \n"), Err(TemplateError::Empty)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse("{ \"Resources\": [unclosed"),
            Err(TemplateError::Unparsable { .. })
        ));
        assert!(matches!(
            parse("key: [a, b\n  - c: :"),
            Err(TemplateError::Unparsable { .. })
        ));
    }

    #[test]
    fn finds_resources_section() {
        let doc = parse(YAML_TEMPLATE).unwrap();
        let resources = resources(&doc).unwrap();
        assert_eq!(resources.len(), 1);
        assert!(resources.contains_key("Logs"));
    }

    #[test]
    fn missing_or_malformed_resources_section() {
        assert!(resources(&parse("Description: nothing here").unwrap()).is_none());
        assert!(resources(&parse(r#"{"Resources": ["a"]}"#).unwrap()).is_none());
        assert!(resources(&parse("just a string").unwrap()).is_none());
    }
}
