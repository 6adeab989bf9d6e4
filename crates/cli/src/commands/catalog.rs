//! Catalog browsing commands.

use clementine_core::ProductId;

use super::Context;

/// List one page of the catalog.
#[allow(clippy::print_stdout)]
pub async fn list(
    ctx: &Context,
    page: u32,
    category: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listing = ctx.store.products(page, category).await?;

    println!("Page {}/{}", listing.page, listing.total_pages);
    for product in &listing.products {
        println!(
            "  {}  ₹{}  {}  (stock: {})",
            product.id, product.price, product.name, product.stock
        );
    }
    Ok(())
}

/// Show one product in detail.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = ctx.store.product(&ProductId::new(id)).await?;

    println!("{}  ₹{}", product.name, product.price);
    if !product.description.is_empty() {
        println!("{}", product.description);
    }
    if !product.sizes.is_empty() {
        println!("Sizes:  {}", product.sizes.join(", "));
    }
    if !product.colors.is_empty() {
        println!("Colors: {}", product.colors.join(", "));
    }
    println!("Stock:  {}", product.stock);
    Ok(())
}
