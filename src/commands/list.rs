//! List command implementation
//!
//! Lists the skills recorded in the marketplace registry, grouped by
//! category.

use console::Style;
use std::collections::BTreeMap;

use crate::cli::ListArgs;
use crate::config::SourceConfig;
use crate::config::marketplace::{Marketplace, MarketplacePlugin};
use crate::error::Result;

/// Run list command
pub fn run(args: ListArgs) -> Result<()> {
    let config = SourceConfig::load(&args.config.config)?;
    let marketplace = Marketplace::from_file(&config.marketplace_path)?;

    let grouped = group_by_category(&marketplace.plugins, args.category.as_deref());
    if grouped.is_empty() {
        match &args.category {
            Some(category) => println!("No skills registered in category '{}'.", category),
            None => println!("No skills registered."),
        }
        return Ok(());
    }

    let count: usize = grouped.values().map(Vec::len).sum();
    println!(
        "{} ({}):",
        Style::new().bold().apply_to(&marketplace.name),
        count
    );
    for (category, plugins) in &grouped {
        println!();
        println!("  {}", Style::new().bold().cyan().apply_to(category));
        for plugin in plugins {
            println!("    {}", Style::new().bold().yellow().apply_to(&plugin.name));
            println!("      {}", plugin.description);
            println!(
                "      {} {}",
                Style::new().dim().apply_to("source:"),
                plugin.source
            );
        }
    }
    Ok(())
}

fn group_by_category<'a>(
    plugins: &'a [MarketplacePlugin],
    only: Option<&str>,
) -> BTreeMap<&'a str, Vec<&'a MarketplacePlugin>> {
    let mut grouped: BTreeMap<&str, Vec<&MarketplacePlugin>> = BTreeMap::new();
    for plugin in plugins {
        if only.is_some_and(|c| c != plugin.category) {
            continue;
        }
        grouped.entry(plugin.category.as_str()).or_default().push(plugin);
    }
    for plugins in grouped.values_mut() {
        plugins.sort_by(|a, b| a.name.cmp(&b.name));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugins() -> Vec<MarketplacePlugin> {
        vec![
            MarketplacePlugin::new("zeta", "z", "./dev/zeta", "dev"),
            MarketplacePlugin::new("alpha", "a", "./dev/alpha", "dev"),
            MarketplacePlugin::new("epub", "e", "./docs/epub", "docs"),
        ]
    }

    #[test]
    fn test_group_by_category_sorts_names() {
        let plugins = plugins();
        let grouped = group_by_category(&plugins, None);
        assert_eq!(grouped.len(), 2);
        let dev: Vec<&str> = grouped["dev"].iter().map(|p| p.name.as_str()).collect();
        assert_eq!(dev, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_group_by_category_filters() {
        let plugins = plugins();
        let grouped = group_by_category(&plugins, Some("docs"));
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec!["docs"]);
        assert!(group_by_category(&plugins, Some("missing")).is_empty());
    }
}
