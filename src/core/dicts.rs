use crate::core::evaluator::{evaluate_expression, is_expression};
use crate::domain::model::{ConstantTable, DictionaryItems, DictionaryTable, Node};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::{ErrorCategory, Result, TransitError};

pub const DICTS_SECTION: &str = "dicts";
pub const DICT_TAG: &str = "dict";
pub const ITEM_TAG: &str = "item";

fn required_attr<'a>(node: &'a Node, attribute: &str, element: &str) -> Result<&'a str> {
    match node.attr(attribute) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(TransitError::MissingRequiredAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }),
    }
}

fn extract_items(dict: &Node, constants: &ConstantTable) -> Result<DictionaryItems> {
    dict.children_named(ITEM_TAG)
        .map(|item| {
            let key = required_attr(item, "key", "item")?;
            let raw = item.trimmed_text();
            let value = if is_expression(raw) {
                evaluate_expression(raw, constants)?.to_string()
            } else {
                raw.to_string()
            };
            Ok((key.to_string(), value))
        })
        .collect()
}

/// Builds the dictionary table from the first `dicts` section under `root`.
/// Item values starting with `@{` are evaluated against `constants`.
pub fn extract_dicts(
    root: &Node,
    constants: &ConstantTable,
    diagnostics: &mut Diagnostics,
) -> Result<DictionaryTable> {
    let mut dicts = DictionaryTable::new();

    let Some(section) = root.find(DICTS_SECTION) else {
        tracing::debug!("No <{}> section found", DICTS_SECTION);
        return Ok(dicts);
    };

    for dict in section.children_named(DICT_TAG) {
        let name = required_attr(dict, "name", "dictionary")?;
        let items = extract_items(dict, constants)?;
        tracing::debug!("Dictionary '{}' has {} items", name, items.len());

        if dicts.insert(name, items).is_some() {
            diagnostics.warn(
                ErrorCategory::Document,
                name,
                format!("dictionary '{}' redeclared; the later declaration wins", name),
            );
        }
    }

    Ok(dicts)
}
