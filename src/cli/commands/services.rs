//! Service directory commands.

use crate::catalogue::CatalogueError;
use crate::resolver::Resolver;

/// List every service in the directory
pub async fn cmd_services(resolver: &Resolver) -> anyhow::Result<()> {
    let services = resolver.directory().services().await?;

    if services.is_empty() {
        println!("No streaming services configured.");
        return Ok(());
    }

    for svc in services {
        let status = if svc.enabled { "✓" } else { "✗" };
        println!("{} {:<16} {}", status, svc.key, svc.display_name);
    }
    Ok(())
}

/// Look up a single service through the cache
pub async fn cmd_service(resolver: &Resolver, key: &str) -> anyhow::Result<()> {
    match resolver.get_service(key).await {
        Ok(svc) => {
            println!("Key:     {}", svc.key);
            println!("Name:    {}", svc.display_name);
            println!("Enabled: {}", svc.enabled);
            if let Some(logo) = &svc.logo_url {
                println!("Logo:    {}", logo);
            }
            Ok(())
        }
        Err(CatalogueError::NotFound) => {
            println!("✗ No service with key {:?}", key);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
