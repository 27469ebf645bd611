//! Print the plan catalog.

use std::io::{self, Write};

use fitplan_core::{Category, catalog};

/// Write the catalog, one plan per line, grouped by category.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn print(out: &mut impl Write, category: Option<Category>) -> io::Result<()> {
    let categories = category.map_or_else(|| Category::ALL.to_vec(), |c| vec![c]);

    for category in categories {
        writeln!(out, "{}", category.title())?;
        for card in catalog::plans(category) {
            writeln!(out, "  {:<16} {:<22} {:>8}", card.id, card.name, card.price().to_string())?;
        }
    }

    Ok(())
}
