// lib/src/ingest/fhir.rs
//
// Just enough of the FHIR Bundle shape to pull out patients and
// observations. Resources stay as raw JSON inside the bundle and are decoded
// one at a time by the normalizer, so one malformed entry cannot fail the
// whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{GraphError, GraphResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(default)]
    pub resource: Option<Value>,
}

impl Bundle {
    /// Decodes a bundle document. A document that is not JSON, or whose
    /// `resourceType` is not `Bundle`, is rejected.
    pub fn from_json_str(text: &str) -> GraphResult<Self> {
        let bundle: Bundle = serde_json::from_str(text)?;
        match bundle.resource_type.as_deref() {
            Some("Bundle") => Ok(bundle),
            Some(other) => Err(GraphError::InvalidBundle(format!(
                "expected resourceType 'Bundle', found '{}'",
                other
            ))),
            None => Err(GraphError::InvalidBundle("missing resourceType".to_string())),
        }
    }

    /// Wraps resources in a collection bundle.
    pub fn from_resources(resources: impl IntoIterator<Item = Value>) -> Self {
        Bundle {
            resource_type: Some("Bundle".to_string()),
            bundle_type: Some("collection".to_string()),
            entry: resources
                .into_iter()
                .map(|resource| BundleEntry { resource: Some(resource) })
                .collect(),
        }
    }

    pub fn resources(&self) -> impl Iterator<Item = &Value> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }
}

/// Decodes a field, falling back to its default when the JSON has the wrong
/// shape. An ill-typed optional field never costs the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Vec<HumanName>,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HumanName {
    #[serde(default, deserialize_with = "lenient")]
    pub family: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub given: Vec<String>,
}

impl HumanName {
    /// Given names followed by the family name.
    pub fn display(&self) -> Option<String> {
        let full = self
            .given
            .iter()
            .map(String::as_str)
            .chain(self.family.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!full.is_empty()).then_some(full)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<CodeableConcept>,
    #[serde(default, deserialize_with = "lenient")]
    pub subject: Option<Reference>,
    #[serde(default, deserialize_with = "lenient")]
    pub value_quantity: Option<Quantity>,
    #[serde(default, deserialize_with = "lenient")]
    pub value_string: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value_codeable_concept: Option<CodeableConcept>,
}

impl ObservationRecord {
    /// Raw value text: `"<value> <unit>"` for quantities, the string itself
    /// for string values, the concept label for coded values.
    pub fn value_text(&self) -> Option<String> {
        if let Some(quantity) = &self.value_quantity {
            return quantity.text();
        }
        if let Some(value) = &self.value_string {
            return Some(value.clone());
        }
        self.value_codeable_concept.as_ref().and_then(CodeableConcept::label)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coding: Vec<Coding>,
}

impl CodeableConcept {
    /// `text`, else the first coding's display, else `system|code`.
    pub fn label(&self) -> Option<String> {
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        let first = self.coding.first()?;
        if let Some(display) = &first.display {
            return Some(display.clone());
        }
        let joined = format!(
            "{}|{}",
            first.system.as_deref().unwrap_or_default(),
            first.code.as_deref().unwrap_or_default()
        );
        let trimmed = joined.trim_matches('|');
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Coding {
    #[serde(default, deserialize_with = "lenient")]
    pub system: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
    #[serde(default, deserialize_with = "lenient")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quantity {
    /// A number, or a numeric string as some exporters write it.
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<String>,
}

impl Quantity {
    pub fn text(&self) -> Option<String> {
        let value = match &self.value {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return None,
        };
        Some(match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {}", value, unit),
            _ => value.to_string(),
        })
    }
}
