//! Rule template compiler
//!
//! Walks a parsed YAML document and produces rule definitions in document
//! order: all predicates of a block first, then all results, each sequence
//! entry expanded key by key. Duplicate action names are preserved
//! verbatim; reconciling them is the consumer's job.

use serde_yaml::Value;
use trapline_core::{NetworkProtocol, NewRule, NewRuleComponent, Template};

use crate::CompilerError;

/// Compiler for rule template documents.
///
/// Stateless and synchronous; compiling the same text twice yields
/// structurally identical output.
pub struct TemplateCompiler;

impl TemplateCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile a YAML sequence of rule blocks into rule definitions.
    ///
    /// An empty or `null` document compiles to an empty list ("no rules
    /// found" is the caller's neutral state, not an error). Any defect
    /// fails the whole compilation; no partial list is ever returned.
    pub fn compile(&self, source: &str) -> Result<Vec<NewRule>, CompilerError> {
        let doc: Value = serde_yaml::from_str(source)?;
        self.rules_from_value(&doc)
    }

    /// Parse a full template document: `id`, `title`, `description`, and a
    /// `rules` sequence compiled with the same walk as [`compile`].
    ///
    /// [`compile`]: TemplateCompiler::compile
    pub fn parse_template(&self, source: &str) -> Result<Template, CompilerError> {
        let doc: Value = serde_yaml::from_str(source)?;
        if !doc.is_mapping() {
            return Err(CompilerError::InvalidStructure(
                "template document must be a mapping".to_string(),
            ));
        }
        self.template_from_value(&doc)
    }

    /// Compile whichever shape the document has: a full template mapping
    /// or a bare sequence of rule blocks.
    pub fn compile_any(&self, source: &str) -> Result<Vec<NewRule>, CompilerError> {
        let doc: Value = serde_yaml::from_str(source)?;
        if doc.is_mapping() {
            Ok(self.template_from_value(&doc)?.rules)
        } else {
            self.rules_from_value(&doc)
        }
    }

    fn template_from_value(&self, doc: &Value) -> Result<Template, CompilerError> {
        let id = non_empty(doc, "id").ok_or_else(|| {
            CompilerError::InvalidStructure("template is missing an id".to_string())
        })?;
        let title = non_empty(doc, "title").ok_or_else(|| {
            CompilerError::InvalidStructure("template is missing a title".to_string())
        })?;
        let description = doc.get("description").map(scalar_to_string).unwrap_or_default();
        let rules = match doc.get("rules") {
            Some(rules) => self.rules_from_value(rules)?,
            None => Vec::new(),
        };

        Ok(Template {
            id,
            title,
            description,
            rules,
        })
    }

    fn rules_from_value(&self, doc: &Value) -> Result<Vec<NewRule>, CompilerError> {
        let blocks = match doc {
            Value::Null => return Ok(Vec::new()),
            Value::Sequence(blocks) => blocks,
            _ => {
                return Err(CompilerError::InvalidStructure(
                    "expected a sequence of rule blocks".to_string(),
                ))
            }
        };

        let mut rules = Vec::with_capacity(blocks.len());
        for block in blocks {
            rules.push(self.rule_from_block(block)?);
        }
        Ok(rules)
    }

    fn rule_from_block(&self, block: &Value) -> Result<NewRule, CompilerError> {
        if !block.is_mapping() {
            return Err(CompilerError::InvalidStructure(
                "rule block must be a mapping".to_string(),
            ));
        }

        let name = non_empty(block, "name").ok_or(CompilerError::MissingRuleName)?;

        // Both spellings occur in the wild; the API's own field name wins.
        let protocol_text = non_empty(block, "networkprotocol")
            .or_else(|| non_empty(block, "protocol"))
            .ok_or_else(|| CompilerError::MissingProtocol { rule: name.clone() })?;
        let protocol: NetworkProtocol =
            protocol_text
                .parse()
                .map_err(|_| CompilerError::UnknownProtocol {
                    rule: name.clone(),
                    value: protocol_text,
                })?;

        // Priority is fixed; templates never carry one of their own.
        let mut rule = NewRule::new(name, protocol);
        expand_entries(block.get("predicates"), true, &mut rule.components)?;
        expand_entries(block.get("results"), false, &mut rule.components)?;
        Ok(rule)
    }
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a `predicates`/`results` sequence into components, entry by
/// entry and key by key, preserving document order.
fn expand_entries(
    list: Option<&Value>,
    is_predicate: bool,
    out: &mut Vec<NewRuleComponent>,
) -> Result<(), CompilerError> {
    let side = if is_predicate { "predicates" } else { "results" };
    let list = match list {
        // Absent, or present but empty (`predicates:` parses as null).
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };

    let entries = list.as_sequence().ok_or_else(|| {
        CompilerError::InvalidStructure(format!("{side} must be a sequence of key/value entries"))
    })?;

    for entry in entries {
        let mapping = entry.as_mapping().ok_or_else(|| {
            CompilerError::InvalidStructure(format!("each {side} entry must be a mapping"))
        })?;
        for (key, value) in mapping {
            out.push(NewRuleComponent {
                action_name: scalar_to_string(key),
                action_value: scalar_to_string(value),
                is_predicate,
            });
        }
    }
    Ok(())
}

/// Total conversion of a YAML value to text. Nothing is rejected here:
/// null becomes the empty string, scalars their canonical rendering, and
/// collections their YAML text. The compiler stays permissive about
/// values; the server decides what they mean.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn non_empty(block: &Value, key: &str) -> Option<String> {
    let text = scalar_to_string(block.get(key)?);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
