//! Schema-less document tree shared by the JSON and YAML template readers.
//!
//! Every accessor returns `Option` so callers can skip nodes whose shape does
//! not match what they expect instead of failing.

use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Map(BTreeMap<String, Document>),
    Seq(Vec<Document>),
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Document {
    pub fn as_map(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// Looks up `key` when this node is a map.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_map()?.get(key)
    }

    /// Walks nested maps along `path`, one key per segment.
    ///
    /// Returns `None` as soon as a segment is missing or the current node is
    /// not a map, so `{"A": 1}` resolved with `["A", "B"]` is not found.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&Document> {
        path.iter()
            .try_fold(self, |current, segment| current.get(segment.as_ref()))
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Document::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Document::Seq(items) => {
                serde_json::Value::Array(items.iter().map(Document::to_json).collect())
            }
            Document::String(s) => serde_json::Value::String(s.clone()),
            Document::Number(Number::Int(i)) => serde_json::Value::from(*i),
            Document::Number(Number::UInt(u)) => serde_json::Value::from(*u),
            Document::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Document::Bool(b) => serde_json::Value::Bool(*b),
            Document::Null => serde_json::Value::Null,
        }
    }
}

/// Canonical text form used when comparing property values with filters.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::String(s) => f.write_str(s),
            Document::Number(n) => write!(f, "{n}"),
            Document::Bool(b) => write!(f, "{b}"),
            Document::Null => f.write_str("null"),
            Document::Map(_) | Document::Seq(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{i}"),
            Number::UInt(u) => write!(f, "{u}"),
            Number::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{}", x as i64),
            Number::Float(x) if x.abs() >= 1e15 => write!(f, "{x:e}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Document::Null,
            serde_json::Value::Bool(b) => Document::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Document::Number(Number::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Document::Number(Number::UInt(u))
                } else {
                    Document::Number(Number::Float(n.as_f64().unwrap_or_default()))
                }
            }
            serde_json::Value::String(s) => Document::String(s),
            serde_json::Value::Array(items) => {
                Document::Seq(items.into_iter().map(Document::from).collect())
            }
            serde_json::Value::Object(map) => Document::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Document {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Document::Null,
            serde_yaml::Value::Bool(b) => Document::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Document::Number(Number::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Document::Number(Number::UInt(u))
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() => Document::Number(Number::Float(f)),
                        Some(f) if f.is_nan() => Document::String("NaN".to_string()),
                        Some(f) if f > 0.0 => Document::String("inf".to_string()),
                        Some(_) => Document::String("-inf".to_string()),
                        None => Document::Null,
                    }
                }
            }
            serde_yaml::Value::String(s) => Document::String(s),
            serde_yaml::Value::Sequence(items) => {
                Document::Seq(items.into_iter().map(Document::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => Document::Map(
                mapping
                    .into_iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, Document::from(v))))
                    .collect(),
            ),
            // `!Ref Assets` reads as `Assets`: the tag is dropped, the value kept.
            serde_yaml::Value::Tagged(tagged) => Document::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match Document::from(key) {
        Document::String(s) => Some(s),
        scalar @ (Document::Number(_) | Document::Bool(_)) => Some(scalar.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> Document {
        Document::from(serde_json::from_str::<serde_json::Value>(text).unwrap())
    }

    fn yaml(text: &str) -> Document {
        Document::from(serde_yaml::from_str::<serde_yaml::Value>(text).unwrap())
    }

    #[test]
    fn resolves_nested_path() {
        let doc = json(r#"{"Versioning":{"Status":"Enabled"}}"#);
        assert_eq!(
            doc.resolve(&["Versioning", "Status"]),
            Some(&Document::String("Enabled".to_string()))
        );
    }

    #[test]
    fn cannot_descend_into_scalar() {
        let doc = json(r#"{"A":1}"#);
        assert_eq!(doc.resolve(&["A", "B"]), None);
        assert_eq!(doc.resolve(&["Missing"]), None);
    }

    #[test]
    fn does_not_index_into_sequences() {
        let doc = json(r#"{"Tags":[{"Key":"env"}]}"#);
        assert_eq!(doc.resolve(&["Tags", "0", "Key"]), None);
    }

    #[test]
    fn canonical_display() {
        assert_eq!(json("true").to_string(), "true");
        assert_eq!(json("null").to_string(), "null");
        assert_eq!(json("8080").to_string(), "8080");
        assert_eq!(json("3.0").to_string(), "3");
        assert_eq!(json("1.5").to_string(), "1.5");
        assert_eq!(json("-7").to_string(), "-7");
        assert_eq!(json("123456789012.0").to_string(), "123456789012");
        assert_eq!(json("1e20").to_string(), "1e20");
        assert_eq!(json("-2.5e16").to_string(), "-2.5e16");
        assert_eq!(json("1.0e15").to_string(), "1e15");
        assert_eq!(json(r#"["a",1]"#).to_string(), r#"["a",1]"#);
        assert_eq!(json(r#"{"b":false}"#).to_string(), r#"{"b":false}"#);
    }

    #[test]
    fn yaml_and_json_agree_on_plain_data() {
        let from_json = json(r#"{"Port": 443, "Enabled": true, "Name": "api", "Ids": [1, 2]}"#);
        let from_yaml = yaml("Port: 443\nEnabled: true\nName: api\nIds: [1, 2]\n");
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn yaml_scalar_keys_become_strings() {
        let doc = yaml("200: ok\ntrue: yes\n");
        assert_eq!(doc.get("200").and_then(Document::as_str), Some("ok"));
        assert_eq!(doc.get("true").and_then(Document::as_str), Some("yes"));
    }

    #[test]
    fn short_form_tags_keep_their_value() {
        let doc = yaml(
            "Bucket: !Ref MyBucket\nArn: !GetAtt MyBucket.Arn\nName: !Sub '${AWS::StackName}-logs'\nZones: !GetAZs ''\n",
        );
        assert_eq!(doc.get("Bucket").and_then(Document::as_str), Some("MyBucket"));
        assert_eq!(doc.get("Arn").and_then(Document::as_str), Some("MyBucket.Arn"));
        assert_eq!(
            doc.get("Name").and_then(Document::as_str),
            Some("${AWS::StackName}-logs")
        );
        assert_eq!(doc.get("Zones").and_then(Document::as_str), Some(""));
        assert_eq!(doc.resolve(&["Bucket", "Ref"]), None);
    }

    #[test]
    fn tagged_sequences_and_maps_are_unwrapped() {
        let doc = yaml("Joined: !Join ['-', [a, b]]\nPicked: !Select [0, !GetAZs '']\n");
        assert_eq!(doc.get("Joined").unwrap().to_string(), r#"["-",["a","b"]]"#);
        assert_eq!(doc.get("Picked").unwrap().to_string(), r#"[0,""]"#);
    }

    #[test]
    fn non_finite_yaml_floats_become_strings() {
        let doc = yaml("a: .nan\nb: -.inf\n");
        assert_eq!(doc.get("a").and_then(Document::as_str), Some("NaN"));
        assert_eq!(doc.get("b").and_then(Document::as_str), Some("-inf"));
    }
}
