use std::collections::BTreeMap;

/// Write target for per-sample annotations.
pub trait GenotypeBuilder {
    fn set_attribute(&mut self, key: &str, value: String);
}

/// In-memory genotype attributes for a single sample.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenotypeAttributes {
    pub sample: String,
    attributes: BTreeMap<String, String>,
}

impl GenotypeAttributes {
    pub fn new(sample: impl Into<String>) -> Self {
        GenotypeAttributes {
            sample: sample.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl GenotypeBuilder for GenotypeAttributes {
    fn set_attribute(&mut self, key: &str, value: String) {
        self.attributes.insert(key.to_string(), value);
    }
}
