//! Clementine CLI - storefront and admin console over the client SDK.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password read from CLEMENTINE_PASSWORD if not passed)
//! clementine login -e shopper@example.com
//!
//! # Browse the catalog
//! clementine products --page 1 --category tops
//!
//! # Cart and checkout
//! clementine cart show
//! clementine cart add <product-id> --quantity 2 --size M
//! clementine checkout --payment cod --first-name Asha --last-name Rao ...
//!
//! # Admin console
//! clementine admin stats
//! clementine admin set-status <order-id> SHIPPED
//! ```
//!
//! State (the access token) persists between runs in the file named by
//! `CLEMENTINE_STORAGE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "clementine")]
#[command(author, version, about = "Clementine storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the access token
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (falls back to $CLEMENTINE_PASSWORD)
        #[arg(short, long, env = "CLEMENTINE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and delete the persisted tokens
    Logout,
    /// Show the identity behind the current session
    Whoami,
    /// List a page of the catalog
    Products {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Product {
        /// Product id
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Update the profile name or email
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Manage saved addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// List the order history
    Orders,
    /// Show one order
    Order {
        /// Order id
        id: String,
    },
    /// Submit an order for the current cart (or a staged buy-now item)
    Checkout(Box<commands::checkout::CheckoutArgs>),
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with computed totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(short, long)]
        size: Option<String>,

        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add(Box<commands::user::AddressArgs>),
    /// Edit a saved address
    Update {
        /// Address id
        id: String,

        #[command(flatten)]
        args: Box<commands::user::AddressArgs>,
    },
    /// Delete a saved address
    Remove {
        /// Address id
        id: String,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Add a product, or remove it if already present
    Toggle {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Dashboard aggregates
    Stats,
    /// List all orders
    Orders,
    /// Move an order to a new status
    SetStatus {
        /// Order id
        id: String,

        /// Target status (PENDING, CONFIRMED, SHIPPED, DELIVERED, CANCELLED)
        status: String,
    },
    /// List customer accounts
    Customers,
    /// Create a product with image uploads
    CreateProduct(Box<commands::admin::ProductArgs>),
    /// Update a product
    UpdateProduct {
        /// Product id
        id: String,

        #[command(flatten)]
        args: Box<commands::admin::ProductArgs>,
    },
    /// Delete a product
    DeleteProduct {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // .env is optional; missing files are fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Products { page, category } => {
            commands::catalog::list(&ctx, page, category.as_deref()).await?;
        }
        Commands::Product { id } => commands::catalog::show(&ctx, &id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add {
                id,
                quantity,
                size,
                color,
            } => commands::cart::add(&ctx, &id, quantity, size, color).await?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, &id).await?,
        },
        Commands::Profile { name, email } => {
            commands::user::update_profile(&ctx, name, email).await?;
        }
        Commands::Address { action } => match action {
            AddressAction::List => commands::user::list_addresses(&ctx).await?,
            AddressAction::Add(args) => commands::user::add_address(&ctx, *args).await?,
            AddressAction::Update { id, args } => {
                commands::user::update_address(&ctx, &id, *args).await?;
            }
            AddressAction::Remove { id } => commands::user::remove_address(&ctx, &id).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::user::show_wishlist(&ctx).await?,
            WishlistAction::Toggle { id } => commands::user::toggle_wishlist(&ctx, &id).await?,
        },
        Commands::Orders => commands::user::orders(&ctx).await?,
        Commands::Order { id } => commands::user::order(&ctx, &id).await?,
        Commands::Checkout(args) => commands::checkout::run(&ctx, *args).await?,
        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::stats(&ctx).await?,
            AdminAction::Orders => commands::admin::orders(&ctx).await?,
            AdminAction::SetStatus { id, status } => {
                commands::admin::set_status(&ctx, &id, &status).await?;
            }
            AdminAction::Customers => commands::admin::customers(&ctx).await?,
            AdminAction::CreateProduct(args) => {
                commands::admin::create_product(&ctx, *args).await?;
            }
            AdminAction::UpdateProduct { id, args } => {
                commands::admin::update_product(&ctx, &id, *args).await?;
            }
            AdminAction::DeleteProduct { id } => {
                commands::admin::delete_product(&ctx, &id).await?;
            }
        },
    }
    Ok(())
}
