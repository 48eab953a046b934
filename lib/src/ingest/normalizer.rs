// lib/src/ingest/normalizer.rs

use log::{debug, warn};
use models::{CodeFact, Fact, NodeId, NodeType, ObservationFact, PatientFact};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::fhir::{Bundle, ObservationRecord, PatientRecord};

/// Facts extracted from one record set, plus how many records were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub facts: Vec<Fact>,
    pub skipped: usize,
}

/// Maps one patient's bundle to an ordered fact sequence: patient facts
/// first, then each observation followed by the codes it references.
///
/// Records missing their `id` and observations without a usable
/// `subject.reference` are skipped and counted; they never abort the run.
/// Optional fields of the wrong JSON type are treated as absent. Resource
/// types other than Patient and Observation are ignored.
pub fn normalize(bundle: &Bundle) -> Normalized {
    let mut patients = Vec::new();
    let mut observations = Vec::new();
    let mut skipped = 0;

    for resource in bundle.resources() {
        let resource_type = resource.get("resourceType").and_then(Value::as_str);
        let outcome = match resource_type {
            Some("Patient") => normalize_patient(resource).map(|f| patients.push(Fact::Patient(f))),
            Some("Observation") => normalize_observation(resource).map(|facts| observations.extend(facts)),
            other => {
                debug!("Ignoring resource of type {:?}", other);
                Ok(())
            }
        };
        if let Err(reason) = outcome {
            warn!("Skipping malformed {} record: {}", resource_type.unwrap_or("unknown"), reason);
            skipped += 1;
        }
    }

    patients.extend(observations);
    Normalized { facts: patients, skipped }
}

fn normalize_patient(resource: &Value) -> Result<PatientFact, String> {
    let record = PatientRecord::deserialize(resource).map_err(|e| e.to_string())?;
    let local = record.id.as_deref().filter(|id| !id.is_empty()).ok_or("missing id")?;
    let id = NodeId::new(NodeType::Patient, local).map_err(|e| e.to_string())?;

    Ok(PatientFact {
        id,
        name: record.name.first().and_then(|n| n.display()),
        gender: record.gender,
        birth_date: record.birth_date,
    })
}

fn normalize_observation(resource: &Value) -> Result<Vec<Fact>, String> {
    let record = ObservationRecord::deserialize(resource).map_err(|e| e.to_string())?;
    let local = record.id.as_deref().filter(|id| !id.is_empty()).ok_or("missing id")?;
    let id = NodeId::new(NodeType::Observation, local).map_err(|e| e.to_string())?;

    let reference = record
        .subject
        .as_ref()
        .and_then(|s| s.reference.as_deref())
        .ok_or_else(|| format!("{} has no subject reference", id))?;
    let subject = NodeId::parse(reference).map_err(|e| format!("{}: subject {}", id, e))?;

    let codes: Vec<CodeFact> = record
        .code
        .iter()
        .flat_map(|concept| concept.coding.iter())
        .filter_map(|coding| match (coding.system.as_deref(), coding.code.as_deref()) {
            (Some(system), Some(code)) if !system.is_empty() && !code.is_empty() => Some(CodeFact {
                system: system.to_string(),
                code: code.to_string(),
                display: coding.display.clone(),
            }),
            _ => {
                debug!("Dropping incomplete coding on {}", id);
                None
            }
        })
        .collect();

    let observation = ObservationFact {
        label: record.code.as_ref().and_then(|c| c.label()),
        value: record.value_text(),
        status: record.status.clone(),
        codes: codes.iter().map(CodeFact::node_id).collect(),
        subject,
        id,
    };

    let mut facts = Vec::with_capacity(codes.len() + 1);
    facts.push(Fact::Observation(observation));
    facts.extend(codes.into_iter().map(Fact::Code));
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(resources: Vec<Value>) -> Bundle {
        Bundle::from_resources(resources)
    }

    fn temperature(id: &str, subject: &str, value: f64) -> Value {
        json!({
            "resourceType": "Observation", "id": id, "status": "final",
            "code": {"text": "Body temperature",
                     "coding": [{"system": "http://loinc.org", "code": "8310-5", "display": "Body temperature"}]},
            "subject": {"reference": subject},
            "valueQuantity": {"value": value, "unit": "Celsius"}
        })
    }

    #[test]
    fn emits_patient_first_then_observation_and_code() {
        let input = bundle(vec![
            temperature("o1", "Patient/p1", 38.5),
            json!({"resourceType": "Patient", "id": "p1", "gender": "female",
                   "birthDate": "1970-01-01", "name": [{"family": "Doe", "given": ["A"]}]}),
        ]);
        let out = normalize(&input);
        assert_eq!(out.skipped, 0);
        assert_eq!(out.facts.len(), 3);

        let Fact::Patient(patient) = &out.facts[0] else { panic!("expected patient fact") };
        assert_eq!(patient.id.as_str(), "Patient/p1");
        assert_eq!(patient.name.as_deref(), Some("A Doe"));
        assert_eq!(patient.birth_date.as_deref(), Some("1970-01-01"));

        let Fact::Observation(obs) = &out.facts[1] else { panic!("expected observation fact") };
        assert_eq!(obs.id.as_str(), "Observation/o1");
        assert_eq!(obs.subject.as_str(), "Patient/p1");
        assert_eq!(obs.label.as_deref(), Some("Body temperature"));
        assert_eq!(obs.value.as_deref(), Some("38.5 Celsius"));
        assert_eq!(obs.codes, vec![NodeId::code("http://loinc.org", "8310-5")]);

        let Fact::Code(code) = &out.facts[2] else { panic!("expected code fact") };
        assert_eq!(code.system, "http://loinc.org");
        assert_eq!(code.code, "8310-5");
    }

    #[test]
    fn skips_records_missing_identity_or_subject() {
        let input = bundle(vec![
            json!({"resourceType": "Patient", "name": [{"family": "Nobody"}]}),
            json!({"resourceType": "Patient", "id": "p1"}),
            json!({"resourceType": "Observation", "status": "final", "subject": {"reference": "Patient/p1"}}),
            json!({"resourceType": "Observation", "id": "o2", "valueString": "38.9"}),
            json!({"resourceType": "Observation", "id": "o3", "subject": {"reference": "urn:uuid:1234"}}),
            temperature("o4", "Patient/p1", 37.0),
        ]);
        let out = normalize(&input);
        assert_eq!(out.skipped, 4);
        assert_eq!(out.facts.len(), 3);
        assert!(matches!(&out.facts[1], Fact::Observation(o) if o.id.as_str() == "Observation/o4"));
    }

    #[test]
    fn keeps_records_with_ill_typed_optional_fields_and_ignores_other_types() {
        let input = bundle(vec![
            json!({"resourceType": "Patient", "id": "p1", "name": "not-a-list", "gender": "male"}),
            json!({"resourceType": "Encounter", "id": "e1", "subject": {"reference": "Patient/p1"}}),
            json!({"resourceType": "Patient", "id": 42}),
        ]);
        let out = normalize(&input);
        assert_eq!(out.skipped, 1);
        assert_eq!(out.facts.len(), 1);
        let Fact::Patient(patient) = &out.facts[0] else { panic!("expected patient fact") };
        assert_eq!(patient.id.as_str(), "Patient/p1");
        assert_eq!(patient.name, None);
        assert_eq!(patient.gender.as_deref(), Some("male"));
    }

    #[test]
    fn string_quantity_and_numeric_status_keep_the_observation() {
        let input = bundle(vec![
            json!({"resourceType": "Patient", "id": "p1"}),
            json!({"resourceType": "Observation", "id": "o1", "status": "final",
                   "code": {"coding": [{"system": "http://loinc.org", "code": "8310-5"}]},
                   "subject": {"reference": "Patient/p1"},
                   "valueQuantity": {"value": "38.6", "unit": "Celsius"}}),
            json!({"resourceType": "Observation", "id": "o2", "status": 5,
                   "code": {"coding": [{"system": "http://loinc.org", "code": "8867-4"}]},
                   "subject": {"reference": "Patient/p1"},
                   "valueQuantity": {"value": 120, "unit": "beats/minute"}}),
        ]);
        let out = normalize(&input);
        assert_eq!(out.skipped, 0);
        assert_eq!(out.facts.len(), 5);

        let Fact::Observation(o1) = &out.facts[1] else { panic!("expected observation fact") };
        assert_eq!(o1.value.as_deref(), Some("38.6 Celsius"));
        let Fact::Observation(o2) = &out.facts[3] else { panic!("expected observation fact") };
        assert_eq!(o2.id.as_str(), "Observation/o2");
        assert_eq!(o2.status, None);
        assert_eq!(o2.value.as_deref(), Some("120 beats/minute"));
    }

    #[test]
    fn keeps_observation_without_coding_and_drops_incomplete_codings() {
        let input = bundle(vec![json!({
            "resourceType": "Observation", "id": "o1",
            "code": {"coding": [{"system": "http://loinc.org"}, {"code": "8867-4"},
                                {"system": "http://loinc.org", "code": "8867-4", "display": "Heart rate"}]},
            "subject": {"reference": "Patient/p1"},
            "valueQuantity": {"value": 112, "unit": "beats/minute"}
        })]);
        let out = normalize(&input);
        assert_eq!(out.skipped, 0);
        assert_eq!(out.facts.len(), 2);
        let Fact::Observation(obs) = &out.facts[0] else { panic!("expected observation fact") };
        assert_eq!(obs.label.as_deref(), Some("http://loinc.org"));
        assert_eq!(obs.codes.len(), 1);
    }

    #[test]
    fn empty_bundle_yields_no_facts() {
        assert_eq!(normalize(&Bundle::default()), Normalized::default());
    }
}
