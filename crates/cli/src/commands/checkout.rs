//! Checkout command: collect the address from flags, submit, and report
//! the outcome.

use clap::Args;

use clementine_client::checkout::form::AddressForm;
use clementine_client::checkout::{BeginOutcome, Checkout, CheckoutMode, SubmitOutcome};
use clementine_client::navigator::routes;
use clementine_core::PaymentMethod;

use super::Context;

/// Address and payment flags for `clementine checkout`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Payment method: cod or online
    #[arg(long, default_value = "cod")]
    pub payment: String,

    /// Check out a staged buy-now item instead of the cart
    #[arg(long)]
    pub buy_now: bool,

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

/// Run the checkout flow end to end.
#[allow(clippy::print_stdout)]
pub async fn run(ctx: &Context, args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login().await?;

    let method = match args.payment.to_ascii_lowercase().as_str() {
        "online" => PaymentMethod::Online,
        "cod" => PaymentMethod::Cod,
        other => return Err(format!("unknown payment method: {other}").into()),
    };

    let mode = if args.buy_now {
        CheckoutMode::BuyNow
    } else {
        CheckoutMode::Cart
    };

    let checkout = Checkout::new(ctx.client.clone(), &ctx.config.gateway_url);

    let ready = match checkout.begin(&ctx.session, mode).await? {
        BeginOutcome::Ready(ready) => ready,
        BeginOutcome::RedirectToLogin => {
            return Err("not logged in - run `clementine login` first".into());
        }
        BeginOutcome::RedirectToCatalog => {
            return Err(format!(
                "nothing staged for buy-now; browse the catalog at {} first",
                routes::CATALOG
            )
            .into());
        }
    };

    let totals = ready.totals();
    println!("{} item(s), total ₹{}", ready.items().len(), totals.total);

    let form = AddressForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        state: args.state,
        zip_code: args.zip_code,
        country: args.country,
    };

    match checkout.submit(&ready, &form, method).await? {
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                println!("  {}: {message}", field.as_str());
            }
            Err("address validation failed".into())
        }
        SubmitOutcome::Failed { notice } => Err(notice.into()),
        SubmitOutcome::Confirmed { order_id } => {
            println!("Order confirmed: {order_id}");
            println!("View it at {}", routes::order_confirmation(order_id.as_str()));
            Ok(())
        }
        SubmitOutcome::Gateway(redirect) => {
            let path = std::env::temp_dir().join("clementine-payment.html");
            std::fs::write(&path, redirect.auto_submit_form())?;
            println!("Open {} in a browser to complete payment", path.display());
            Ok(())
        }
    }
}
