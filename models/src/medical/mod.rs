// models/src/medical/mod.rs

pub mod code;
pub mod observation;
pub mod patient;

pub use code::CodeFact;
pub use observation::ObservationFact;
pub use patient::PatientFact;

/// One normalized fact extracted from a patient record set.
#[derive(Clone, Debug, PartialEq)]
pub enum Fact {
    Patient(PatientFact),
    Observation(ObservationFact),
    Code(CodeFact),
}

impl From<PatientFact> for Fact {
    fn from(fact: PatientFact) -> Self {
        Fact::Patient(fact)
    }
}

impl From<ObservationFact> for Fact {
    fn from(fact: ObservationFact) -> Self {
        Fact::Observation(fact)
    }
}

impl From<CodeFact> for Fact {
    fn from(fact: CodeFact) -> Self {
        Fact::Code(fact)
    }
}
