use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{document::Document, error::CfnError};

/// `key=value` filter on a resource property; the key may be a dotted path
/// such as `Versioning.Status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    key: String,
    path: Vec<String>,
    expected: String,
}

impl PropertyFilter {
    pub fn new(key: &str, expected: impl Into<String>) -> Result<Self, CfnError> {
        let invalid = |reason| CfnError::InvalidFilterSyntax {
            token: format!("{key}="),
            reason,
        };
        if key.is_empty() {
            return Err(invalid("empty property name"));
        }
        let path: Vec<String> = key.split('.').map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(invalid("empty segment in property path"));
        }

        Ok(Self {
            key: key.to_string(),
            path,
            expected: expected.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// The resolved value when it is present, non-null and renders as the
    /// expected string.
    fn check<'a>(&self, properties: &'a Document) -> Option<&'a Document> {
        properties
            .resolve(&self.path)
            .filter(|value| !value.is_null() && value.to_string() == self.expected)
    }
}

impl FromStr for PropertyFilter {
    type Err = CfnError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| CfnError::InvalidFilterSyntax {
                token: token.to_string(),
                reason: "expected key=value",
            })?;
        PropertyFilter::new(key, value).map_err(|err| match err {
            CfnError::InvalidFilterSyntax { reason, .. } => CfnError::InvalidFilterSyntax {
                token: token.to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.key, self.expected)
    }
}

/// Everything a resource has to satisfy to be reported. All filters are
/// ANDed; an unset filter is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub resource_type: Option<String>,
    pub resource_name: Option<String>,
    properties: Vec<PropertyFilter>,
}

impl SearchCriteria {
    pub fn new(
        resource_type: Option<String>,
        resource_name: Option<String>,
        properties: impl IntoIterator<Item = PropertyFilter>,
    ) -> Self {
        let mut criteria = Self {
            resource_type: resource_type.filter(|t| !t.is_empty()),
            resource_name: resource_name.filter(|n| !n.is_empty()),
            properties: Vec::new(),
        };
        for filter in properties {
            criteria = criteria.with_property(filter);
        }
        criteria
    }

    /// Adds a property filter, replacing an earlier one on the same key.
    pub fn with_property(mut self, filter: PropertyFilter) -> Self {
        match self.properties.iter_mut().find(|f| f.key == filter.key) {
            Some(existing) => *existing = filter,
            None => self.properties.push(filter),
        }
        self
    }

    pub fn properties(&self) -> &[PropertyFilter] {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.resource_type.is_none() && self.resource_name.is_none() && self.properties.is_empty()
    }

    fn admits_type(&self, resource_type: &str) -> bool {
        self.resource_type
            .as_deref()
            .map_or(true, |wanted| wanted == resource_type)
    }

    fn admits_name(&self, logical_id: &str) -> bool {
        self.resource_name
            .as_deref()
            .map_or(true, |wanted| logical_id.contains(wanted))
    }

    /// Matched `(key, value)` pairs, or `None` as soon as one filter fails.
    fn check_properties(&self, resource: &Document) -> Option<BTreeMap<String, Document>> {
        if self.properties.is_empty() {
            return Some(BTreeMap::new());
        }
        let properties = resource.get("Properties").filter(|p| p.as_map().is_some())?;

        self.properties
            .iter()
            .map(|filter| {
                filter
                    .check(properties)
                    .map(|value| (filter.key.clone(), value.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMatch {
    pub logical_id: String,
    pub resource_type: String,
    pub matched_properties: BTreeMap<String, Document>,
}

/// Resources from a template's `Resources` section that pass every filter in
/// `criteria`, in logical id order. Malformed entries are skipped.
pub fn match_resources(
    resources: &BTreeMap<String, Document>,
    criteria: &SearchCriteria,
) -> Vec<ResourceMatch> {
    resources
        .iter()
        .filter_map(|(logical_id, resource)| {
            resource.as_map()?;
            let resource_type = resource.get("Type")?.as_str()?;
            if !criteria.admits_type(resource_type) || !criteria.admits_name(logical_id) {
                return None;
            }
            let matched_properties = criteria.check_properties(resource)?;

            Some(ResourceMatch {
                logical_id: logical_id.clone(),
                resource_type: resource_type.to_string(),
                matched_properties,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template;

    const TEMPLATE: &str = r#"{
        "Resources": {
            "IamRoleProduct": {
                "Type": "AWS::ServiceCatalog::CloudFormationProvisionedProduct",
                "Properties": {
                    "ProductName": "IAMRole",
                    "ProvisioningArtifactName": "2.1.0"
                }
            },
            "LogsBucket": {
                "Type": "AWS::S3::Bucket",
                "Properties": {
                    "BucketName": "logs",
                    "Versioning": {"Status": "Enabled"},
                    "ObjectLockEnabled": true
                }
            },
            "LogsBucketPolicy": {
                "Type": "AWS::S3::BucketPolicy",
                "Properties": {"Bucket": {"Ref": "LogsBucket"}}
            },
            "DataBucket": {"Type": "AWS::S3::Bucket"},
            "Broken": "not a resource",
            "Untyped": {"Properties": {"BucketName": "logs"}},
            "WeirdProperties": {"Type": "AWS::S3::Bucket", "Properties": ["BucketName"]}
        }
    }"#;

    fn run(criteria: &SearchCriteria) -> Vec<ResourceMatch> {
        let doc = template::parse(TEMPLATE).unwrap();
        match_resources(template::resources(&doc).unwrap(), criteria)
    }

    fn ids(matches: &[ResourceMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.logical_id.as_str()).collect()
    }

    fn by_type(resource_type: &str) -> SearchCriteria {
        SearchCriteria::new(Some(resource_type.to_string()), None, [])
    }

    fn prop(token: &str) -> PropertyFilter {
        token.parse().unwrap()
    }

    #[test]
    fn type_filter_is_exact() {
        let matches = run(&by_type("AWS::S3::Bucket"));
        assert_eq!(ids(&matches), ["DataBucket", "LogsBucket", "WeirdProperties"]);
        assert!(matches.iter().all(|m| m.matched_properties.is_empty()));

        assert_eq!(ids(&run(&by_type("AWS::S3::BucketPolicy"))), ["LogsBucketPolicy"]);
        assert!(run(&by_type("AWS::S3")).is_empty());
    }

    #[test]
    fn all_property_filters_must_match() {
        let product = "AWS::ServiceCatalog::CloudFormationProvisionedProduct";
        let one = by_type(product).with_property(prop("ProductName=IAMRole"));
        assert_eq!(ids(&run(&one)), ["IamRoleProduct"]);

        let both = one.with_property(prop("ProvisioningArtifactName=3.0.0"));
        assert!(run(&both).is_empty());
    }

    #[test]
    fn records_nested_matches() {
        let criteria = by_type("AWS::S3::Bucket")
            .with_property(prop("Versioning.Status=Enabled"))
            .with_property(prop("BucketName=logs"));
        let matches = run(&criteria);

        assert_eq!(ids(&matches), ["LogsBucket"]);
        let matched = &matches[0].matched_properties;
        assert_eq!(matched.len(), 2);
        assert_eq!(matched["Versioning.Status"].to_string(), "Enabled");
        assert_eq!(matched["BucketName"].to_string(), "logs");
    }

    #[test]
    fn compares_non_string_values_by_display_form() {
        let criteria = SearchCriteria::default().with_property(prop("ObjectLockEnabled=true"));
        assert_eq!(ids(&run(&criteria)), ["LogsBucket"]);

        let reference = SearchCriteria::default().with_property(prop("Bucket.Ref=LogsBucket"));
        assert_eq!(ids(&run(&reference)), ["LogsBucketPolicy"]);
    }

    #[test]
    fn name_filter_is_case_sensitive_substring() {
        let criteria = SearchCriteria::new(None, Some("Bucket".to_string()), []);
        assert_eq!(
            ids(&run(&criteria)),
            ["DataBucket", "LogsBucket", "LogsBucketPolicy"]
        );

        let lower = SearchCriteria::new(None, Some("bucket".to_string()), []);
        assert!(run(&lower).is_empty());
    }

    #[test]
    fn name_and_type_combine() {
        let criteria = SearchCriteria::new(
            Some("AWS::S3::Bucket".to_string()),
            Some("Logs".to_string()),
            [],
        );
        assert_eq!(ids(&run(&criteria)), ["LogsBucket"]);
    }

    #[test]
    fn skips_malformed_entries() {
        let all = run(&SearchCriteria::default());
        assert!(!ids(&all).contains(&"Broken"));
        assert!(!ids(&all).contains(&"Untyped"));

        let criteria = SearchCriteria::default().with_property(prop("BucketName=logs"));
        assert_eq!(ids(&run(&criteria)), ["LogsBucket"]);
    }

    #[test]
    fn null_values_never_match() {
        let doc = template::parse(r#"{"Resources": {"A": {"Type": "T", "Properties": {"K": null}}}}"#)
            .unwrap();
        let criteria = SearchCriteria::default().with_property(prop("K=null"));
        assert!(match_resources(template::resources(&doc).unwrap(), &criteria).is_empty());
    }

    #[test]
    fn parses_property_tokens() {
        let filter = prop("Versioning.Status=Enabled");
        assert_eq!(filter.key(), "Versioning.Status");
        assert_eq!(filter.path(), ["Versioning", "Status"]);
        assert_eq!(filter.expected(), "Enabled");

        let with_equals = prop("Tags.Query=a=b");
        assert_eq!(with_equals.expected(), "a=b");
        assert_eq!(prop("Description=").expected(), "");
    }

    #[test]
    fn rejects_bad_property_tokens() {
        for token in ["BucketName", "=value", "Versioning..Status=x", ".Status=x"] {
            match token.parse::<PropertyFilter>() {
                Err(CfnError::InvalidFilterSyntax { token: t, .. }) => assert_eq!(t, token),
                other => panic!("expected syntax error for {token}, got {other:?}"),
            }
        }
    }

    #[test]
    fn later_filter_on_same_key_wins() {
        let criteria = SearchCriteria::new(None, None, [prop("BucketName=data"), prop("BucketName=logs")]);
        assert_eq!(criteria.properties().len(), 1);
        assert_eq!(criteria.properties()[0].expected(), "logs");
    }
}
