use crate::domain::model::{ConstantTable, Node};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::{ErrorCategory, Result, TransitError};

pub const CONSTANTS_SECTION: &str = "constants";
pub const CONSTANT_TAG: &str = "const";

/// Builds the constant table from the first `constants` section under `root`.
///
/// Redeclared names overwrite silently as far as the result is concerned;
/// a warning is recorded so the overwrite is still visible.
pub fn extract_constants(root: &Node, diagnostics: &mut Diagnostics) -> Result<ConstantTable> {
    let mut constants = ConstantTable::new();

    let Some(section) = root.find(CONSTANTS_SECTION) else {
        tracing::debug!("No <{}> section found", CONSTANTS_SECTION);
        return Ok(constants);
    };

    for declaration in section.children_named(CONSTANT_TAG) {
        let name = match declaration.attr("name") {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(TransitError::MissingRequiredAttribute {
                    element: "constant".to_string(),
                    attribute: "name".to_string(),
                })
            }
        };

        let value = declaration.trimmed_text();
        if let Some(previous) = constants.insert(name, value) {
            diagnostics.warn(
                ErrorCategory::Document,
                name,
                format!(
                    "constant '{}' redeclared; '{}' replaces '{}'",
                    name, value, previous
                ),
            );
        }
    }

    tracing::debug!("Extracted {} constants", constants.len());
    Ok(constants)
}
