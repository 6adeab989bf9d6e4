//! Profile, address book, wishlist, and order-history commands.

use clap::Args;

use clementine_client::api::user;
use clementine_core::{AddressId, OrderId, ProductId};

use super::Context;

/// Address fields for `clementine address add` / `address update`.
#[derive(Debug, Args)]
pub struct AddressArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip_code: String,
    #[arg(long, default_value = "India")]
    pub country: String,
}

impl From<AddressArgs> for user::AddressInput {
    fn from(args: AddressArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
        }
    }
}

/// Update the profile name and/or email.
#[allow(clippy::print_stdout)]
pub async fn update_profile(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    if name.is_none() && email.is_none() {
        return Err("nothing to update; pass --name and/or --email".into());
    }

    let updated = user::update_profile(&ctx.client, &user::ProfileUpdate { name, email }).await?;
    println!("Profile is now {} <{}>", updated.name, updated.email);
    Ok(())
}

/// List saved addresses.
#[allow(clippy::print_stdout)]
pub async fn list_addresses(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let addresses = user::addresses(&ctx.client).await?;
    if addresses.is_empty() {
        println!("No saved addresses");
        return Ok(());
    }
    for a in addresses {
        println!(
            "  {}  {} {}, {}, {} {} ({})",
            a.id, a.first_name, a.last_name, a.address, a.city, a.zip_code, a.country
        );
    }
    Ok(())
}

/// Save a new address.
#[allow(clippy::print_stdout)]
pub async fn add_address(
    ctx: &Context,
    args: AddressArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let saved = user::add_address(&ctx.client, &args.into()).await?;
    println!("Saved address {}", saved.id);
    Ok(())
}

/// Edit a saved address.
#[allow(clippy::print_stdout)]
pub async fn update_address(
    ctx: &Context,
    id: &str,
    args: AddressArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let saved = user::update_address(&ctx.client, &AddressId::new(id), &args.into()).await?;
    println!("Updated address {}", saved.id);
    Ok(())
}

/// Delete a saved address.
#[allow(clippy::print_stdout)]
pub async fn remove_address(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    user::delete_address(&ctx.client, &AddressId::new(id)).await?;
    println!("Deleted address {id}");
    Ok(())
}

/// Show the wishlist.
#[allow(clippy::print_stdout)]
pub async fn show_wishlist(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let products = user::wishlist(&ctx.client).await?;
    if products.is_empty() {
        println!("Wishlist is empty");
        return Ok(());
    }
    for product in products {
        println!("  {}  ₹{}  {}", product.id, product.price, product.name);
    }
    Ok(())
}

/// Add a product to the wishlist, or remove it if already present.
#[allow(clippy::print_stdout)]
pub async fn toggle_wishlist(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let products = user::toggle_wishlist(&ctx.client, &ProductId::new(id)).await?;
    println!("Wishlist now has {} product(s)", products.len());
    Ok(())
}

/// List the order history.
#[allow(clippy::print_stdout)]
pub async fn orders(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    for order in user::orders(&ctx.client).await? {
        println!(
            "  {}  {:?}  ₹{}  {}",
            order.id,
            order.status,
            order.total,
            order.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

/// Show one order in detail.
#[allow(clippy::print_stdout)]
pub async fn order(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let order = user::order(&ctx.client, &OrderId::new(id)).await?;
    println!("Order {}", order.id);
    println!("Status:  {:?}", order.status);
    println!("Payment: {:?} ({:?})", order.payment_method, order.payment_status);
    println!("Total:   ₹{}", order.total);
    for item in &order.items {
        println!("  {} x{}  ₹{}", item.name, item.quantity, item.price);
    }
    Ok(())
}
