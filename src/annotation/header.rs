use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcfType {
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNumber {
    GenotypeCount, // 'G'
}

impl fmt::Display for VcfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcfType::String => write!(f, "String"),
        }
    }
}

impl fmt::Display for FieldNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldNumber::GenotypeCount => write!(f, "G"),
        }
    }
}

/// Metadata for one per-sample output field, declared once in the output header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub vcf_type: VcfType,
    pub number: FieldNumber,
    pub description: &'static str,
}

impl FieldDescriptor {
    pub const fn format(
        id: &'static str,
        vcf_type: VcfType,
        number: FieldNumber,
        description: &'static str,
    ) -> Self {
        FieldDescriptor {
            id,
            vcf_type,
            number,
            description,
        }
    }

    /// Renders the `##FORMAT=<...>` header line.
    pub fn header_line(&self) -> String {
        format!(
            r#"##FORMAT=<ID={},Number={},Type={},Description="{}">"#,
            self.id, self.number, self.vcf_type, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_header_line() {
        let field = FieldDescriptor::format(
            "FRS",
            VcfType::String,
            FieldNumber::GenotypeCount,
            "Featurized read sets",
        );
        assert_eq!(
            field.header_line(),
            r#"##FORMAT=<ID=FRS,Number=G,Type=String,Description="Featurized read sets">"#
        );
    }
}
