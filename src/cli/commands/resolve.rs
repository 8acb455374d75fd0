//! Link resolution command.

use crate::error::ResultExt;
use crate::resolver::{ResolveInput, ResolvedGroup, Resolver};

use super::NOTHING_FOUND;

/// Resolve a link, group id or external id and print every service link
pub async fn cmd_resolve(resolver: &Resolver, raw: &str) -> anyhow::Result<()> {
    let input = ResolveInput::parse(raw);

    let result = resolver
        .resolve(&input)
        .await
        .with_context(format!("Failed to resolve {}", input));

    match result {
        Ok(group) => {
            print_group(&group);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{}", NOTHING_FOUND);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_group(group: &ResolvedGroup) {
    println!("✓ {} ({})", group.title(), group.kind);
    println!("  {}", group.description());
    if group.best.has_artwork() {
        println!("  Artwork: {}", group.best.artwork_link);
    }
    println!("  Share:   {}", group.share_path());
    println!();

    let width = group
        .items
        .iter()
        .map(|l| l.service.display_name.len())
        .max()
        .unwrap_or(0);

    for link in &group.items {
        println!(
            "  {:<width$}  {}",
            link.service.display_name,
            link.item.link,
            width = width
        );
    }
}
