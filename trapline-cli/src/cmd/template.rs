//! Template commands: compile, inspect, apply

use std::path::Path;

use clap::Subcommand;
use trapline_compiler::{catalog, CompilerError, TemplateCompiler};
use trapline_core::{ActionName, NewRule};

use crate::output::print_json;
use crate::Context;

#[derive(Subcommand)]
pub enum TemplateSubcommand {
    /// Parse a template and print its rules
    Show {
        /// Catalog id or path to a YAML file
        source: String,
    },
    /// Compile a template document and report defects
    Check {
        /// Catalog id or path to a YAML file
        source: String,
    },
    /// Compile a template and create its rules on a zone
    Apply {
        /// Catalog id or path to a YAML file
        source: String,
        #[arg(long)]
        zone: String,
    },
}

pub async fn run(ctx: &Context, subcmd: TemplateSubcommand) -> anyhow::Result<()> {
    match subcmd {
        TemplateSubcommand::Show { source } => show(ctx, &source),
        TemplateSubcommand::Check { source } => check(&source),
        TemplateSubcommand::Apply { source, zone } => apply(ctx, &source, &zone).await,
    }
}

/// List the built-in catalog.
pub fn run_catalog(ctx: &Context) -> anyhow::Result<()> {
    let compiler = TemplateCompiler::new();
    let mut entries = Vec::new();
    for id in catalog::ids() {
        // Catalog text is ours; failing to parse it is a bug, not input.
        let template = compiler.parse_template(catalog::builtin(id).expect("known id"))?;
        entries.push(template);
    }

    if ctx.json {
        return print_json(&entries);
    }
    for template in &entries {
        println!("{:12}  {}", template.id, template.title);
        println!("{:12}  {}", "", template.description);
    }
    Ok(())
}

fn show(ctx: &Context, source: &str) -> anyhow::Result<()> {
    let text = load_source(source)?;
    let rules = match compile_rules(&text) {
        Ok(rules) => rules,
        // The error text is the operator-facing surface; show it plainly.
        Err(err) => anyhow::bail!("{err}"),
    };

    if ctx.json {
        return print_json(&rules);
    }
    if rules.is_empty() {
        println!("no rules found");
        return Ok(());
    }
    for rule in &rules {
        println!("{} ({}, priority {})", rule.name, rule.protocol, rule.priority);
        for component in &rule.components {
            let side = if component.is_predicate { "if" } else { "then" };
            println!("  {side:4} {}: {}", component.action_name, component.action_value);
        }
    }
    Ok(())
}

fn check(source: &str) -> anyhow::Result<()> {
    let text = load_source(source)?;
    let rules = match compile_rules(&text) {
        Ok(rules) => rules,
        Err(err) => anyhow::bail!("{err}"),
    };

    if rules.is_empty() {
        println!("no rules found");
        return Ok(());
    }

    // Unknown or misplaced action names are the server's call to reject;
    // here they only warrant a heads-up.
    for rule in &rules {
        for component in &rule.components {
            match ActionName::parse(&component.action_name) {
                None => println!(
                    "warning: rule '{}' uses unknown action '{}'",
                    rule.name, component.action_name
                ),
                Some(action) if !action.valid_for(rule.protocol, component.is_predicate) => {
                    println!(
                        "warning: rule '{}' uses '{}' as a {} on {}",
                        rule.name,
                        component.action_name,
                        if component.is_predicate { "predicate" } else { "result" },
                        rule.protocol
                    )
                }
                Some(_) => {}
            }
        }
    }
    println!(
        "ok: {} rule(s), {} component(s)",
        rules.len(),
        rules.iter().map(|r| r.components.len()).sum::<usize>()
    );
    Ok(())
}

async fn apply(ctx: &Context, source: &str, zone: &str) -> anyhow::Result<()> {
    let text = load_source(source)?;
    let rules = match compile_rules(&text) {
        Ok(rules) => rules,
        Err(err) => anyhow::bail!("{err}"),
    };
    if rules.is_empty() {
        println!("no rules found; nothing to apply");
        return Ok(());
    }

    let existing = ctx.client.get_rules(zone).await.unwrap_or_default();
    if !existing.is_empty() {
        println!(
            "note: {zone} already has {} rule(s); new ones are added alongside",
            existing.len()
        );
    }

    let created = ctx.client.apply_rules(zone, &rules).await?;
    for rule in &created {
        println!("created rule '{}' ({})", rule.name, rule.rule_id);
    }
    Ok(())
}

/// Resolve a catalog id or a file path to template text.
fn load_source(source: &str) -> anyhow::Result<String> {
    if let Some(text) = catalog::builtin(source) {
        return Ok(text.to_string());
    }
    let path = Path::new(source);
    std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("cannot read template '{source}': {err}"))
}

/// Compile either a full template document or a bare rule-block sequence.
fn compile_rules(text: &str) -> Result<Vec<NewRule>, CompilerError> {
    TemplateCompiler::new().compile_any(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_both_document_shapes() {
        let bare = "- name: r\n  protocol: http\n";
        assert_eq!(compile_rules(bare).unwrap().len(), 1);

        let full = "id: t\ntitle: T\nrules:\n  - name: r\n    protocol: http\n";
        assert_eq!(compile_rules(full).unwrap().len(), 1);
    }

    #[test]
    fn catalog_ids_resolve_without_touching_disk() {
        assert!(load_source("jsalertdom").is_ok());
        assert!(load_source("/definitely/not/a/file.yaml").is_err());
    }
}
