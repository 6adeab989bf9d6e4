//! Login, logout, and identity commands.

use secrecy::SecretString;

use clementine_client::api;

use super::Context;

/// Log in and persist the access token.
#[allow(clippy::print_stdout)]
pub async fn login(
    ctx: &Context,
    email: &str,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = SecretString::from(password);
    let payload = api::auth::login(&ctx.client, email, &password).await?;

    let name = payload.user.name.clone();
    ctx.session.login(&ctx.client, payload).await?;

    println!("Logged in as {name} <{email}>");
    Ok(())
}

/// Log out and delete the persisted tokens.
#[allow(clippy::print_stdout)]
pub async fn logout(ctx: &Context) {
    ctx.session.logout(&ctx.client).await;
    println!("Logged out");
}

/// Show the identity behind the current session.
#[allow(clippy::print_stdout)]
pub async fn whoami(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.session.check_auth(&ctx.client).await;

    match session.user {
        Some(user) => println!("{} <{}> ({:?})", user.name, user.email, user.role),
        None => println!("Not logged in"),
    }
    Ok(())
}
