use anyhow::{bail, Context, Result};
use foodquest_core::model::Recommendation;
use foodquest_search::{CatalogIndex, Preferences, RelaxationTier};
use std::path::Path;

fn open_index(catalog_path: &Path) -> Result<CatalogIndex> {
    CatalogIndex::from_csv(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))
}

/// Recommend restaurants similar to a named one in the same city.
pub fn run_recommend(
    catalog_path: &Path,
    name: &str,
    city: &str,
    top_n: usize,
    json: bool,
) -> Result<()> {
    let index = open_index(catalog_path)?;
    let results = index.recommend(name, city, top_n);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No restaurant called \"{}\" found in {}.", name, city);
        return Ok(());
    }

    println!("\n🍽️  Restaurants like \"{}\" in {}\n", name, city);
    print_results(&results);
    Ok(())
}

/// Recommend restaurants matching declared preferences.
pub fn run_preferences(
    catalog_path: &Path,
    prefs: &Preferences,
    top_n: usize,
    json: bool,
) -> Result<()> {
    let index = open_index(catalog_path)?;
    let outcome = index.recommend_by_preferences_with_tier(prefs, top_n);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.results.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    println!("\n🍽️  Recommended for you\n");
    if outcome.tier != RelaxationTier::Full {
        println!("  (no exact match; showing results for {})\n", outcome.tier);
    }
    print_results(&outcome.results);
    Ok(())
}

/// List catalog rows matching name, city and cuisine fragments.
pub fn run_explore(
    catalog_path: &Path,
    name: &str,
    city: &str,
    cuisine: &str,
    limit: usize,
    json: bool,
) -> Result<()> {
    let index = open_index(catalog_path)?;
    let Some(rows) = index.browse(name, city, cuisine, limit) else {
        bail!("Give at least one of --name, --city or --cuisine");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No restaurants match.");
        return Ok(());
    }

    println!("\n🔎 {} restaurant(s)\n", rows.len());
    for r in rows {
        println!("  {} ({})  ★ {:.1}", r.name, r.city, r.rating);
        println!("      {}", r.cuisines);
        if !r.address.is_empty() {
            println!("      📍 {}", r.address);
        }
    }
    println!();
    Ok(())
}

fn print_results(results: &[Recommendation]) {
    for (rank, r) in results.iter().enumerate() {
        println!("  {:>2}. {} ({})  score {:.3}", rank + 1, r.name, r.city, r.score);
        println!("      {}", r.cuisines);
        if !r.address.is_empty() {
            println!("      📍 {}", r.address);
        }
    }
    println!();
}
