//! Admin console commands.

use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;

use clementine_client::api::admin;
use clementine_core::{OrderId, OrderStatus, ProductId};

use super::Context;

/// Product fields for `clementine admin create-product` / `update-product`.
#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub price: Decimal,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    /// Comma-separated sizes, e.g. S,M,L
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<String>,
    /// Comma-separated colors
    #[arg(long, value_delimiter = ',')]
    pub colors: Vec<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Image files to upload
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

impl ProductArgs {
    fn into_parts(self) -> Result<(admin::ProductInput, Vec<admin::ImageUpload>), Box<dyn std::error::Error>> {
        let images = self
            .images
            .iter()
            .map(|path| read_image(path))
            .collect::<Result<Vec<_>, _>>()?;

        let input = admin::ProductInput {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            sizes: self.sizes,
            colors: self.colors,
            stock: self.stock,
        };
        Ok((input, images))
    }
}

fn read_image(path: &PathBuf) -> Result<admin::ImageUpload, Box<dyn std::error::Error>> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("bad image path: {}", path.display()))?
        .to_owned();

    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    Ok(admin::ImageUpload {
        file_name,
        content_type: content_type.to_owned(),
        bytes: std::fs::read(path)?,
    })
}

/// Print dashboard aggregates.
#[allow(clippy::print_stdout)]
pub async fn stats(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let stats = admin::dashboard_stats(&ctx.client).await?;
    println!("Orders:    {}", stats.total_orders);
    println!("Revenue:   ₹{}", stats.total_revenue);
    println!("Customers: {}", stats.total_customers);
    println!("Pending:   {}", stats.pending_orders);
    Ok(())
}

/// List all orders.
#[allow(clippy::print_stdout)]
pub async fn orders(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    for order in admin::orders(&ctx.client).await? {
        println!(
            "  {}  {:?}  {:?}/{:?}  ₹{}  {}",
            order.id,
            order.status,
            order.payment_method,
            order.payment_status,
            order.total,
            order.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

/// Move an order to a new status, pre-checking the transition locally.
#[allow(clippy::print_stdout)]
pub async fn set_status(
    ctx: &Context,
    id: &str,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let target: OrderStatus = serde_json::from_value(serde_json::Value::String(
        status.to_ascii_uppercase(),
    ))
    .map_err(|_| format!("unknown status: {status}"))?;

    let order_id = OrderId::new(id);
    let current = admin::orders(&ctx.client)
        .await?
        .into_iter()
        .find(|o| o.id == order_id)
        .ok_or_else(|| format!("no such order: {id}"))?;

    if !current.status.can_transition_to(target) {
        return Err(format!(
            "cannot move {:?} -> {target:?}; allowed: {:?}",
            current.status,
            current.status.allowed_transitions()
        )
        .into());
    }

    let updated = admin::set_order_status(&ctx.client, &order_id, target).await?;
    println!("Order {} is now {:?}", updated.id, updated.status);
    Ok(())
}

/// List customer accounts.
#[allow(clippy::print_stdout)]
pub async fn customers(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    for customer in admin::customers(&ctx.client).await? {
        println!("  {}  {} <{}>", customer.id, customer.name, customer.email);
    }
    Ok(())
}

/// Create a product, uploading its images.
#[allow(clippy::print_stdout)]
pub async fn create_product(
    ctx: &Context,
    args: ProductArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let (input, images) = args.into_parts()?;
    let product = admin::create_product(&ctx.client, &input, images).await?;
    println!("Created product {} ({})", product.id, product.name);
    Ok(())
}

/// Update a product; images passed here replace the existing ones.
#[allow(clippy::print_stdout)]
pub async fn update_product(
    ctx: &Context,
    id: &str,
    args: ProductArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let (input, images) = args.into_parts()?;
    let product = admin::update_product(&ctx.client, &ProductId::new(id), &input, images).await?;
    println!("Updated product {}", product.id);
    Ok(())
}

/// Delete a product.
#[allow(clippy::print_stdout)]
pub async fn delete_product(ctx: &Context, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    admin::delete_product(&ctx.client, &ProductId::new(id)).await?;
    println!("Deleted product {id}");
    Ok(())
}
