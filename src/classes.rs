use serde::{Deserialize, Serialize};

/// Number of conditions the classifier distinguishes.
pub const CLASS_COUNT: usize = 4;

/// The ocular conditions the network was trained on.
///
/// The declaration order is load-bearing: variant index `i` corresponds to
/// position `i` of the model's output vector, so reordering variants without
/// retraining the checkpoint silently mislabels every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseClass {
    Cataract,
    DiabeticRetinopathy,
    Glaucoma,
    Normal,
}

impl DiseaseClass {
    /// All classes in output-vector order.
    pub const ALL: [DiseaseClass; CLASS_COUNT] = [
        DiseaseClass::Cataract,
        DiseaseClass::DiabeticRetinopathy,
        DiseaseClass::Glaucoma,
        DiseaseClass::Normal,
    ];

    /// Position of this class in the model's output vector.
    pub fn index(self) -> usize {
        match self {
            DiseaseClass::Cataract            => 0,
            DiseaseClass::DiabeticRetinopathy => 1,
            DiseaseClass::Glaucoma            => 2,
            DiseaseClass::Normal              => 3,
        }
    }

    /// Class at the given output-vector position, or `None` if out of range.
    pub fn from_index(index: usize) -> Option<DiseaseClass> {
        DiseaseClass::ALL.get(index).copied()
    }

    /// Machine-readable label, as written to the prediction log.
    pub fn name(self) -> &'static str {
        match self {
            DiseaseClass::Cataract            => "cataract",
            DiseaseClass::DiabeticRetinopathy => "diabetic_retinopathy",
            DiseaseClass::Glaucoma            => "glaucoma",
            DiseaseClass::Normal              => "normal",
        }
    }

    /// Human-readable label for page and CLI output.
    pub fn display_name(self) -> &'static str {
        match self {
            DiseaseClass::Cataract            => "Cataract",
            DiseaseClass::DiabeticRetinopathy => "Diabetic Retinopathy",
            DiseaseClass::Glaucoma            => "Glaucoma",
            DiseaseClass::Normal              => "Normal",
        }
    }
}

impl std::fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_count_is_four() {
        assert_eq!(DiseaseClass::ALL.len(), CLASS_COUNT);
        assert_eq!(CLASS_COUNT, 4);
    }

    #[test]
    fn index_round_trips() {
        for class in DiseaseClass::ALL {
            assert_eq!(DiseaseClass::from_index(class.index()), Some(class));
        }
        assert_eq!(DiseaseClass::from_index(CLASS_COUNT), None);
    }

    #[test]
    fn names_match_training_labels() {
        let names: Vec<&str> = DiseaseClass::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["cataract", "diabetic_retinopathy", "glaucoma", "normal"]);
    }

    #[test]
    fn serde_uses_snake_case_labels() {
        let json = serde_json::to_string(&DiseaseClass::DiabeticRetinopathy).unwrap();
        assert_eq!(json, "\"diabetic_retinopathy\"");
    }
}
