//! Cart commands.

use clementine_client::checkout::totals;
use clementine_client::types::CartLineInput;
use clementine_core::ProductId;

use super::Context;

/// Show the cart with computed totals.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let cart = ctx.store.cart().await?;
    if cart.items.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }

    for item in &cart.items {
        let variant = [item.size.as_deref(), item.color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("/");
        println!(
            "  {} x{}  ₹{}  {}",
            item.name,
            item.quantity,
            item.price,
            if variant.is_empty() { "-" } else { &variant }
        );
    }

    let totals = totals::compute(&cart.items);
    println!("Subtotal: ₹{}", totals.subtotal);
    println!("Shipping: ₹{}", totals.shipping);
    println!("Tax:      ₹{}", totals.tax);
    println!("Total:    ₹{}", totals.total);
    Ok(())
}

/// Add a product to the cart.
#[allow(clippy::print_stdout)]
pub async fn add(
    ctx: &Context,
    id: &str,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let cart = ctx
        .store
        .add_to_cart(&CartLineInput {
            product_id: ProductId::new(id),
            quantity,
            size,
            color,
        })
        .await?;

    println!("Cart now has {} line(s)", cart.items.len());
    Ok(())
}

/// Remove a product from the cart.
#[allow(clippy::print_stdout)]
pub async fn remove(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let cart = ctx.store.remove_from_cart(&ProductId::new(id)).await?;
    println!("Cart now has {} line(s)", cart.items.len());
    Ok(())
}
