//! The ordered set of classes a model can predict.

use crate::core::errors::{ClassifyError, ClassifyResult};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Classes of the bundled skin-condition model, in output order.
const SKIN_CONDITIONS: [&str; 25] = [
    "Acne And Rosacea Photos",
    "Actinic Keratosis Basal Cell Carcinoma And Other Malignant Lesions",
    "Atopic Dermatitis Photos",
    "Ba Cellulitis",
    "Ba Impetigo",
    "Bullous Disease Photos",
    "Cellulitis Impetigo And Other Bacterial Infections",
    "Eczema Photos",
    "Fu Athlete Foot",
    "Fu Nail Fungus",
    "Fu Ringworm",
    "Heathy",
    "Herpes Hpv And Other Stds Photos",
    "Lupus And Other Connective Tissue Diseases",
    "Poison Ivy Photos And Other Contact Dermatitis",
    "Psoriasis Pictures Lichen Planus And Related Diseases",
    "Scabies Lyme Disease And Other Infestations And Bites",
    "Seborrheic Keratoses And Other Benign Tumors",
    "Tinea Ringworm Candidiasis And Other Fungal Infections",
    "Urticaria Hives",
    "Vascular Tumors",
    "Vasculitis Photos",
    "Vi Chickenpox",
    "Vi Shingles",
    "Warts Molluscum And Other Viral Infections",
];

/// Label metadata file layout.
#[derive(Debug, Deserialize)]
struct LabelMetadata {
    labels: Vec<String>,
}

/// Ordered, immutable list of class names.
///
/// Index `i` names output position `i` of the model's score vector. Cloning is cheap;
/// the names are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTaxonomy {
    names: Arc<[String]>,
}

impl ClassTaxonomy {
    /// Creates a taxonomy, rejecting empty lists, blank names and duplicates.
    pub fn new<I, S>(names: I) -> ClassifyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(ClassifyError::config_error(
                "class taxonomy must contain at least one class",
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ClassifyError::config_error_with_context(
                    &format!("taxonomy[{index}]"),
                    name,
                    "class name must not be blank",
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ClassifyError::config_error_with_context(
                    &format!("taxonomy[{index}]"),
                    name,
                    "duplicate class name",
                ));
            }
        }

        Ok(Self {
            names: names.into(),
        })
    }

    /// The 25-class skin-condition taxonomy the bundled model was trained on.
    pub fn skin_conditions() -> Self {
        Self {
            names: SKIN_CONDITIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Loads class names from a `{"labels": [...]}` metadata file.
    pub fn from_metadata_file(path: impl AsRef<Path>) -> ClassifyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::config_error(format!(
                "failed to read label metadata '{}': {e}",
                path.display()
            ))
        })?;
        let metadata: LabelMetadata = serde_json::from_str(&content)?;
        Self::new(metadata.labels)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed taxonomy; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Class name at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Position of the class called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterates over the names in output order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Stable identifier for a class name: lower-case, spaces as underscores, no parentheses.
pub fn class_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_skin_conditions_order() {
        let taxonomy = ClassTaxonomy::skin_conditions();
        assert_eq!(taxonomy.len(), 25);
        assert_eq!(taxonomy.name(0), Some("Acne And Rosacea Photos"));
        assert_eq!(taxonomy.index_of("Heathy"), Some(11));
        assert_eq!(
            taxonomy.name(24),
            Some("Warts Molluscum And Other Viral Infections")
        );
        assert_eq!(taxonomy.name(25), None);
    }

    #[test]
    fn test_rejects_empty_taxonomy() {
        assert!(ClassTaxonomy::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_rejects_blank_and_duplicate_names() {
        assert!(ClassTaxonomy::new(["cat", "  "]).is_err());
        assert!(ClassTaxonomy::new(["cat", "dog", "cat"]).is_err());
        assert!(ClassTaxonomy::new(["cat", "dog"]).is_ok());
    }

    #[test]
    fn test_from_metadata_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"labels": ["Eczema", "Heathy", "Psoriasis"]}}"#).unwrap();

        let taxonomy = ClassTaxonomy::from_metadata_file(file.path()).unwrap();
        assert_eq!(taxonomy.len(), 3);
        assert_eq!(taxonomy.iter().collect::<Vec<_>>(), ["Eczema", "Heathy", "Psoriasis"]);
    }

    #[test]
    fn test_from_malformed_metadata_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"classes": ["a"]}}"#).unwrap();
        assert!(ClassTaxonomy::from_metadata_file(file.path()).is_err());
    }

    #[test]
    fn test_class_slug() {
        assert_eq!(class_slug("Fu Athlete Foot"), "fu_athlete_foot");
        assert_eq!(class_slug("Warts (Viral)"), "warts_viral");
    }
}
