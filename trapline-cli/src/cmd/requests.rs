//! Captured-traffic listing

use crate::output::print_json;
use crate::Context;

pub async fn run(
    ctx: &Context,
    zone: &str,
    limit: usize,
    skip: usize,
    protocols: &str,
) -> anyhow::Result<()> {
    let requests = ctx.client.get_requests(zone, limit, skip, protocols).await?;

    if ctx.json {
        return print_json(&requests);
    }
    if requests.is_empty() {
        println!("no captured requests on {zone}");
        return Ok(());
    }
    for request in &requests {
        println!(
            "{}  {:5}  {}  {}  {} -> {}",
            request.time.format("%Y-%m-%d %H:%M:%S"),
            request.protocol,
            request.clientip,
            request.fqdn,
            request.reqsummary,
            request.respsummary
        );
    }
    Ok(())
}
