//! Rule inspection and maintenance commands

use clap::Subcommand;
use trapline_core::{ActionName, Rule};
use uuid::Uuid;

use crate::output::print_json;
use crate::Context;

#[derive(Subcommand)]
pub enum RulesSubcommand {
    /// List rules on a zone
    List { zone: String },
    /// Show one rule with its components
    Show { zone: String, rule_id: Uuid },
    /// Delete a rule and its components
    Delete { zone: String, rule_id: Uuid },
    /// Change a rule's priority
    Priority {
        zone: String,
        rule_id: Uuid,
        priority: u32,
    },
}

pub async fn run(ctx: &Context, subcmd: RulesSubcommand) -> anyhow::Result<()> {
    match subcmd {
        RulesSubcommand::List { zone } => list(ctx, &zone).await,
        RulesSubcommand::Show { zone, rule_id } => show(ctx, &zone, rule_id).await,
        RulesSubcommand::Delete { zone, rule_id } => {
            let rule = ctx.client.get_rule(&zone, rule_id).await?;
            ctx.client.delete_rule(&rule).await?;
            println!("deleted rule '{}' from {zone}", rule.name);
            Ok(())
        }
        RulesSubcommand::Priority {
            zone,
            rule_id,
            priority,
        } => {
            let rule = ctx.client.get_rule(&zone, rule_id).await?;
            ctx.client.update_rule_priority(&rule, priority).await?;
            println!("rule '{}' now has priority {priority}", rule.name);
            Ok(())
        }
    }
}

async fn list(ctx: &Context, zone: &str) -> anyhow::Result<()> {
    let rules = ctx.client.get_rules(zone).await?;
    if ctx.json {
        return print_json(&rules);
    }
    if rules.is_empty() {
        println!("no rules on {zone}");
        return Ok(());
    }
    for rule in &rules {
        println!(
            "{}  p{}  {}  {}  ({} components)",
            rule.rule_id,
            rule.priority,
            rule.protocol,
            rule.name,
            rule.components.len()
        );
    }
    Ok(())
}

async fn show(ctx: &Context, zone: &str, rule_id: Uuid) -> anyhow::Result<()> {
    let rule = ctx.client.get_rule(zone, rule_id).await?;
    if ctx.json {
        return print_json(&rule);
    }
    print_rule(&rule);
    Ok(())
}

fn print_rule(rule: &Rule) {
    println!("{} (priority {}, {})", rule.name, rule.priority, rule.protocol);
    for component in &rule.components {
        let side = if component.is_predicate { "if" } else { "then" };
        let label: &str = match ActionName::parse(&component.action_name) {
            Some(action) => action.label(component.is_predicate),
            None => &component.action_name,
        };
        println!("  {side:4} {label}: {}", component.action_value);
    }
}
