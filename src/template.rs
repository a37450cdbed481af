//! Path template interpolation
//!
//! Handles `{param}` placeholders in stream paths such as
//! `/board/{board_id}/issue`, filled from the stream context.

use crate::context::Context;
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching path parameters: {name}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}").expect("path template regex is valid")
});

/// Render a path template with the given context
///
/// Every placeholder must be present in the context.
pub fn render(template: &str, ctx: &Context) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = TEMPLATE_REGEX.replace_all(template, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match ctx.get(name) {
            Some(value) => value_to_string(value),
            None => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

/// Convert a JSON value to a string for template substitution
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_substitution() {
        let ctx = Context::new().with_value("board_id", 10000);
        let result = render("/board/{board_id}/issue", &ctx).unwrap();
        assert_eq!(result, "/board/10000/issue");
    }

    #[test]
    fn test_string_substitution() {
        let ctx = Context::new().with_value("project", "EX");
        assert_eq!(render("/project/{project}", &ctx).unwrap(), "/project/EX");
    }

    #[test]
    fn test_multiple_substitutions() {
        let ctx = Context::new()
            .with_value("board_id", 1)
            .with_value("sprint_id", 2);
        let result = render("/board/{board_id}/sprint/{sprint_id}", &ctx).unwrap();
        assert_eq!(result, "/board/1/sprint/2");
    }

    #[test]
    fn test_undefined_variable() {
        let result = render("/board/{board_id}/sprint", &Context::new());
        assert!(matches!(
            result,
            Err(Error::UndefinedVariable { ref variable }) if variable == "board_id"
        ));
    }

    #[test]
    fn test_no_templates() {
        assert_eq!(render("/users", &Context::new()).unwrap(), "/users");
    }

    #[test]
    fn test_whitespace_in_template() {
        let ctx = Context::new().with_value("board_id", 5);
        assert_eq!(render("/board/{ board_id }", &ctx).unwrap(), "/board/5");
    }
}
