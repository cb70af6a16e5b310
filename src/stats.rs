//! Catalog overview.
//!
//! Prints row totals and the same grouped counts the API serves, so an
//! operator can confirm an import landed where expected.

use anyhow::Result;

use crate::db::Catalog;
use crate::images;
use crate::models::{Image, Quote};
use crate::query::count_all;
use crate::quotes;

/// Run the stats command: query both catalogs and print a summary.
pub async fn run_stats(catalog: &Catalog) -> Result<()> {
    let total_quotes = count_all::<Quote>(&catalog.quotes).await?;
    let total_images = count_all::<Image>(&catalog.images).await?;

    println!("Catalog Stats");
    println!("=============");
    println!();
    println!("  Quotes:      {}", total_quotes);
    println!("  Images:      {}", total_images);

    let languages = quotes::quote_languages(&catalog.quotes).await?;
    print_groups(
        "Quotes by language",
        "LANGUAGE",
        languages.iter().map(|l| (l.language.as_str(), l.count)),
    );

    let categories = images::image_categories(&catalog.images).await?;
    print_groups(
        "Images by category",
        "CATEGORY",
        categories.iter().map(|c| (c.category.as_str(), c.count)),
    );

    let photographers = images::image_photographers(&catalog.images).await?;
    print_groups(
        "Images by photographer",
        "PHOTOGRAPHER",
        photographers
            .iter()
            .map(|p| (p.photographer.as_str(), p.count)),
    );

    println!();
    Ok(())
}

fn print_groups<'a>(title: &str, header: &str, rows: impl Iterator<Item = (&'a str, i64)>) {
    let rows: Vec<_> = rows.collect();
    if rows.is_empty() {
        return;
    }
    println!();
    println!("  {}:", title);
    println!("  {:<32} {:>8}", header, "COUNT");
    println!("  {}", "-".repeat(41));
    for (key, count) in rows {
        println!("  {:<32} {:>8}", key, count);
    }
}
