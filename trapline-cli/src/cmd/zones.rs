//! Zone management commands

use clap::Subcommand;
use trapline_core::Zone;

use crate::output::print_json;
use crate::Context;

#[derive(Subcommand)]
pub enum ZonesSubcommand {
    /// List zones, hidden ones omitted unless --all
    List {
        #[arg(long)]
        all: bool,
    },
    /// Request new zones
    Add {
        /// Preferred subdomain label; the server assigns one when omitted
        #[arg(long, default_value = "")]
        name: String,
        /// Parent domain to create the zone under
        #[arg(long, default_value = "")]
        domain: String,
        /// Number of zones to create
        #[arg(long, default_value_t = 1)]
        num: u32,
    },
    /// Delete a zone (owner permission required)
    Delete { fqdn: String },
    /// Toggle a zone in the hidden set
    Hide { fqdn: String },
    /// Pin an explicit display order for zones
    Order {
        #[arg(required = true)]
        fqdns: Vec<String>,
    },
}

pub async fn run(ctx: &Context, subcmd: ZonesSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ZonesSubcommand::List { all } => list(ctx, all).await,
        ZonesSubcommand::Add { name, domain, num } => add(ctx, &name, &domain, num).await,
        ZonesSubcommand::Delete { fqdn } => {
            ctx.client.delete_zone(&fqdn).await?;
            println!("deleted {fqdn}");
            Ok(())
        }
        ZonesSubcommand::Hide { fqdn } => {
            let hidden = ctx.prefs.toggle_hidden(&fqdn).await?;
            println!("{fqdn} is now {}", if hidden { "hidden" } else { "visible" });
            Ok(())
        }
        ZonesSubcommand::Order { fqdns } => {
            ctx.prefs.set_zone_order(&fqdns).await?;
            println!("zone order pinned ({} zones)", fqdns.len());
            Ok(())
        }
    }
}

async fn list(ctx: &Context, all: bool) -> anyhow::Result<()> {
    let mut zones = ctx.client.get_zones().await?;
    ctx.prefs.set_zones(&zones).await?;

    let hidden = ctx.prefs.hidden_zones().await?;
    if !all {
        zones.retain(|z| !hidden.contains(&z.fqdn));
    }
    order_zones(&mut zones, &ctx.prefs.zone_order().await?);

    if ctx.json {
        return print_json(&zones);
    }
    if zones.is_empty() {
        println!("no zones");
        return Ok(());
    }
    for zone in &zones {
        let marker = if hidden.contains(&zone.fqdn) { " (hidden)" } else { "" };
        println!("{}  [{}]{}", zone.fqdn, zone.domain, marker);
    }
    Ok(())
}

async fn add(ctx: &Context, name: &str, domain: &str, num: u32) -> anyhow::Result<()> {
    if ctx.client.add_zone(name, domain, num).await? {
        println!("zone request accepted");
    } else {
        println!("no free zones available");
    }
    Ok(())
}

/// Pinned zones first, in pinned order; everything else after,
/// alphabetically.
fn order_zones(zones: &mut [Zone], pinned: &[String]) {
    zones.sort_by(|a, b| {
        let rank = |z: &Zone| pinned.iter().position(|p| p == &z.fqdn);
        match (rank(a), rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.fqdn.cmp(&b.fqdn),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(fqdn: &str) -> Zone {
        Zone {
            fqdn: fqdn.to_string(),
            domain: "example.net".to_string(),
        }
    }

    #[test]
    fn pinned_zones_sort_first() {
        let mut zones = vec![zone("c.example.net"), zone("a.example.net"), zone("b.example.net")];
        let pinned = vec!["b.example.net".to_string()];
        order_zones(&mut zones, &pinned);
        let fqdns: Vec<_> = zones.iter().map(|z| z.fqdn.as_str()).collect();
        assert_eq!(fqdns, vec!["b.example.net", "a.example.net", "c.example.net"]);
    }
}
