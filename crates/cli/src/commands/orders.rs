//! Inspect orders saved in the local fallback store.
//!
//! Orders land here when the document store was unreachable at checkout.
//! `export` emits them as JSON so they can be replayed elsewhere.

use std::error::Error;
use std::io::Write;
use std::path::Path;

use fitplan_storefront::services::FileOrderStore;
use tracing::info;

/// Write one summary line per stored order.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the output cannot be written.
pub async fn list(out: &mut impl Write, path: &Path) -> Result<(), Box<dyn Error>> {
    let orders = FileOrderStore::new(path).list().await?;
    info!(path = %path.display(), count = orders.len(), "Loaded local orders");

    for stored in &orders {
        let order = &stored.order;
        writeln!(
            out,
            "{}  {}  {:<8} {:<22} {:>8}  {}  {}",
            stored.order_id,
            stored.timestamp,
            order.category,
            order.plan_name,
            order.price.to_string(),
            order.status,
            order.intake.profile.name,
        )?;
    }

    Ok(())
}

/// Write every stored order to `out` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the output cannot be written.
pub async fn export(out: &mut impl Write, path: &Path) -> Result<(), Box<dyn Error>> {
    let orders = FileOrderStore::new(path).list().await?;
    info!(path = %path.display(), count = orders.len(), "Exporting local orders");

    serde_json::to_writer_pretty(&mut *out, &orders)?;
    writeln!(out)?;
    Ok(())
}
