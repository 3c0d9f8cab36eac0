use crate::annotation::{FeaturizedReadSets, FieldDescriptor, GenotypeAnnotation};
use crate::cli::HeaderArgs;
use crate::utils::Result;
use std::io::{self, Write};

fn header_lines(descriptors: &[FieldDescriptor]) -> Vec<String> {
    descriptors.iter().map(FieldDescriptor::header_line).collect()
}

pub fn header(_args: HeaderArgs) -> Result<()> {
    let annotation = FeaturizedReadSets::default();
    let mut out = io::stdout().lock();
    for line in header_lines(&annotation.descriptors()) {
        writeln!(out, "{}", line).map_err(|e| format!("Failed to write header: {}", e))?;
    }
    Ok(())
}
