//! Attribute expression language
//!
//! Property values that support expressions may reference record attributes
//! with `${name}`, e.g. `/var/log/flows/${path}`. An attribute that is not
//! present evaluates to the empty string. `$$` produces a literal `$`.

use std::collections::HashMap;

use crate::error::{WhatsFlowingError, WhatsFlowingResult};

/// Evaluates a property value in the context of a record's attributes
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(
        &self,
        template: &str,
        attributes: &HashMap<String, String>,
    ) -> WhatsFlowingResult<String>;
}

/// Default evaluator: `${attribute}` substitution
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeExpressionEvaluator;

impl ExpressionEvaluator for AttributeExpressionEvaluator {
    fn evaluate(
        &self,
        template: &str,
        attributes: &HashMap<String, String>,
    ) -> WhatsFlowingResult<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
            } else if let Some(body) = after.strip_prefix('{') {
                let end = body.find('}').ok_or_else(|| {
                    WhatsFlowingError::Expression(format!(
                        "unterminated expression at offset {} in '{}'",
                        template.len() - rest.len() + pos,
                        template
                    ))
                })?;

                let name = body[..end].trim();
                if name.is_empty() {
                    return Err(WhatsFlowingError::Expression(format!(
                        "empty expression in '{}'",
                        template
                    )));
                }

                if let Some(value) = attributes.get(name) {
                    out.push_str(value);
                }
                rest = &body[end + 1..];
            } else {
                out.push('$');
                rest = after;
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}
