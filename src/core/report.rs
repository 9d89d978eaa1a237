use crate::core::collector::collect_annotations;
use crate::core::constants::extract_constants;
use crate::core::dicts::extract_dicts;
use crate::core::evaluator::{evaluate_expression, is_expression};
use crate::domain::model::{ConstantTable, DictionaryItems, DictionaryTable, Node, Report};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::Result;

pub const EVAL_SECTION: &str = "eval";
pub const EXPRESSION_TAG: &str = "expression";

pub fn format_constant(name: &str, value: &str) -> String {
    format!("{} -> {}", value, name)
}

pub fn format_dictionary(name: &str, items: &DictionaryItems) -> String {
    let body = items
        .iter()
        .map(|(key, value)| format!("{} = {}", key, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("dict( {} ) -> {}", body, name)
}

/// One line per `expression` of the first `eval` section: the evaluated
/// result for marker-wrapped text, the trimmed text otherwise.
pub fn evaluate_section(root: &Node, constants: &ConstantTable) -> Result<Vec<String>> {
    let Some(section) = root.find(EVAL_SECTION) else {
        return Ok(Vec::new());
    };

    section
        .children_named(EXPRESSION_TAG)
        .map(|element| {
            let text = element.trimmed_text();
            if is_expression(text) {
                evaluate_expression(text, constants).map(|value| value.to_string())
            } else {
                Ok(text.to_string())
            }
        })
        .collect()
}

/// Concatenates annotations, constants, dictionaries and evaluated
/// expressions, in that order.
pub fn assemble_report(
    root: &Node,
    annotations: Vec<String>,
    constants: &ConstantTable,
    dicts: &DictionaryTable,
) -> Result<Report> {
    let mut lines = annotations;
    lines.extend(constants.iter().map(|(name, value)| format_constant(name, value)));
    lines.extend(dicts.iter().map(|(name, items)| format_dictionary(name, items)));
    lines.extend(evaluate_section(root, constants)?);
    Ok(Report::new(lines))
}

/// Runs collection, extraction and assembly over a parsed document.
pub fn transform_document(root: &Node, diagnostics: &mut Diagnostics) -> Result<Report> {
    let annotations = collect_annotations(root);
    let constants = extract_constants(root, diagnostics)?;
    let dicts = extract_dicts(root, &constants, diagnostics)?;

    tracing::info!(
        "Resolved {} annotation lines, {} constants, {} dictionaries",
        annotations.len(),
        constants.len(),
        dicts.len()
    );

    assemble_report(root, annotations, &constants, &dicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::TransitError;

    fn expression(text: &str) -> Node {
        Node::element(EXPRESSION_TAG).with_text(text)
    }

    fn sample() -> Node {
        Node::element("root")
            .with_child(
                Node::element("constants")
                    .with_child(Node::element("const").with_attr("name", "CONST_ONE").with_text("10"))
                    .with_child(Node::element("const").with_attr("name", "CONST_TWO").with_text("20")),
            )
            .with_child(
                Node::element("dicts").with_child(
                    Node::element("dict")
                        .with_attr("name", "test_dict")
                        .with_child(Node::element("item").with_attr("key", "key1").with_text("val1"))
                        .with_child(Node::element("item").with_attr("key", "key2").with_text("val2")),
                ),
            )
            .with_child(
                Node::element(EVAL_SECTION)
                    .with_child(expression("@{ CONST_ONE CONST_TWO + }"))
                    .with_child(expression("@{ CONST_TWO 5 * }"))
                    .with_child(expression("  Just a text  ")),
            )
            .with_child(Node::comment(" note "))
    }

    #[test]
    fn test_format_lines() {
        assert_eq!(format_constant("A", "1"), "1 -> A");
        let items = vec![("k1".to_string(), "v1".to_string()), ("k2".to_string(), "v2".to_string())];
        assert_eq!(format_dictionary("d", &items), "dict( k1 = v1, k2 = v2 ) -> d");
        assert_eq!(format_dictionary("empty", &Vec::new()), "dict(  ) -> empty");
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let report = transform_document(&sample(), &mut Diagnostics::new()).unwrap();

        assert_eq!(
            report.lines,
            vec![
                "<!--",
                " note ",
                "-->",
                "10 -> CONST_ONE",
                "20 -> CONST_TWO",
                "dict( key1 = val1, key2 = val2 ) -> test_dict",
                "30",
                "100",
                "Just a text",
            ]
        );
    }

    #[test]
    fn test_transform_is_repeatable() {
        let root = sample();
        let first = transform_document(&root, &mut Diagnostics::new()).unwrap();
        for _ in 0..10 {
            assert_eq!(transform_document(&root, &mut Diagnostics::new()).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_expression_element_gives_empty_line() {
        let root = Node::element("root")
            .with_child(Node::element(EVAL_SECTION).with_child(Node::element(EXPRESSION_TAG)));
        let lines = evaluate_section(&root, &ConstantTable::new()).unwrap();
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_failing_expression_aborts_assembly() {
        let root = Node::element("root")
            .with_child(Node::element(EVAL_SECTION).with_child(expression("@{ 1 + }")));
        let err = transform_document(&root, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, TransitError::StackUnderflow { .. }));
    }
}
