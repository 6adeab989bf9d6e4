//! Checkout orchestration.
//!
//! The flow is `Loading -> Ready -> Submitting -> {Redirected, Failed}`,
//! expressed as types: [`Checkout::begin`] does the loading and either
//! yields a [`CheckoutReady`] or a redirect instruction, and
//! [`Checkout::submit`] consumes one submit attempt. A failed submission
//! leaves the `CheckoutReady` usable for another attempt.
//!
//! Items come from exactly one source per checkout - the persisted cart,
//! or the short-lived buy-now record written by the product page - never
//! both.

pub mod form;
pub mod gateway;
pub mod totals;

use tracing::{instrument, warn};

use clementine_core::{OrderId, PaymentMethod};

use crate::api::payment::{self, DirectItem, OrderSubmission};
use crate::api::store::StoreApi;
use crate::api::user;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::session::SessionStore;
use crate::storage::keys;
use crate::types::{CartItem, SavedAddress};

use form::{AddressForm, FieldErrors};
use gateway::GatewayRedirect;
use totals::Totals;

/// How checkout was entered, carried as a query parameter in the
/// navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    /// Items come from the persisted cart resource.
    Cart,
    /// Items come from the buy-now record; the cart is untouched.
    BuyNow,
}

impl CheckoutMode {
    /// Parse the `mode` query parameter.
    #[must_use]
    pub fn from_query(mode: Option<&str>) -> Self {
        if mode == Some("buy_now") {
            Self::BuyNow
        } else {
            Self::Cart
        }
    }
}

/// Result of the loading phase.
#[derive(Debug)]
pub enum BeginOutcome {
    /// Addresses and items loaded; the form can be shown.
    Ready(CheckoutReady),
    /// The auth gate failed before any data fetch started.
    RedirectToLogin,
    /// Buy-now mode with a missing or stale record: fail closed rather
    /// than proceed with an empty cart.
    RedirectToCatalog,
}

/// A checkout in the `Ready` state.
#[derive(Debug)]
pub struct CheckoutReady {
    items: Vec<CartItem>,
    saved_addresses: Vec<SavedAddress>,
    totals: Totals,
    used_buy_now: bool,
}

impl CheckoutReady {
    /// The items being purchased.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The user's saved addresses, for prefilling the form.
    #[must_use]
    pub fn saved_addresses(&self) -> &[SavedAddress] {
        &self.saved_addresses
    }

    /// Computed order amounts.
    #[must_use]
    pub const fn totals(&self) -> Totals {
        self.totals
    }

    /// Whether this checkout consumes the buy-now record.
    #[must_use]
    pub const fn used_buy_now(&self) -> bool {
        self.used_buy_now
    }
}

/// Result of one submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Client-side validation failed; no network call was made. The state
    /// stays `Ready` with these field errors surfaced.
    Invalid(FieldErrors),
    /// The backend rejected or failed the order. The state returns to
    /// `Ready`; the buy-now record, if any, is kept for the retry.
    Failed {
        notice: String,
    },
    /// COD order finalized server-side; show the confirmation page.
    Confirmed {
        order_id: OrderId,
    },
    /// ONLINE order created; hand off to the gateway's hosted page.
    Gateway(GatewayRedirect),
}

/// Checkout orchestrator.
pub struct Checkout {
    client: ApiClient,
    store: StoreApi,
    gateway_url: String,
}

impl Checkout {
    /// Create an orchestrator that submits gateway redirects to
    /// `gateway_url`.
    #[must_use]
    pub fn new(client: ApiClient, gateway_url: &url::Url) -> Self {
        Self {
            store: StoreApi::new(client.clone()),
            client,
            gateway_url: gateway_url.to_string(),
        }
    }

    /// Loading phase: resolve the auth gate, then fetch saved addresses
    /// and items concurrently.
    ///
    /// # Errors
    ///
    /// Propagates dispatcher errors from the address or cart fetch.
    #[instrument(skip(self, session))]
    pub async fn begin(
        &self,
        session: &SessionStore,
        mode: CheckoutMode,
    ) -> Result<BeginOutcome, ApiError> {
        // Auth gate resolves before any data fetch starts.
        let snapshot = session.snapshot().await;
        if !snapshot.is_authenticated {
            return Ok(BeginOutcome::RedirectToLogin);
        }

        let (items, saved_addresses, used_buy_now) = match mode {
            CheckoutMode::BuyNow => {
                // The record read is local, so only addresses go to the
                // network - and only once the record is known good.
                match self.read_buy_now_record() {
                    Some(items) if !items.is_empty() => {
                        let saved_addresses = user::addresses(&self.client).await?;
                        (items, saved_addresses, true)
                    }
                    _ => {
                        warn!("buy-now record missing or stale; failing closed");
                        return Ok(BeginOutcome::RedirectToCatalog);
                    }
                }
            }
            CheckoutMode::Cart => {
                let (cart, saved_addresses) =
                    tokio::try_join!(self.store.cart(), user::addresses(&self.client))?;
                (cart.items, saved_addresses, false)
            }
        };
        let totals = totals::compute(&items);

        Ok(BeginOutcome::Ready(CheckoutReady {
            items,
            saved_addresses,
            totals,
            used_buy_now,
        }))
    }

    /// One submit attempt: validate, issue exactly one order-creation
    /// request, branch on the payment mode.
    ///
    /// # Errors
    ///
    /// `ApiError::SessionExpired` propagates (the dispatcher has already
    /// torn the session down); every other backend failure is reported as
    /// [`SubmitOutcome::Failed`] so the user can resubmit.
    #[instrument(skip_all, fields(method = ?method))]
    pub async fn submit(
        &self,
        ready: &CheckoutReady,
        address: &AddressForm,
        method: PaymentMethod,
    ) -> Result<SubmitOutcome, ApiError> {
        if let Err(errors) = form::validate(address) {
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let submission = OrderSubmission {
            address: address.clone(),
            payment_method: method,
            direct_items: ready.used_buy_now.then(|| {
                ready
                    .items
                    .iter()
                    .map(|item| DirectItem {
                        product_id: item.product_id.clone(),
                        quantity: item.quantity,
                        size: item.size.clone(),
                        color: item.color.clone(),
                    })
                    .collect()
            }),
        };

        let outcome = match payment::create_order(&self.client, &submission).await {
            Ok(outcome) => outcome,
            Err(ApiError::SessionExpired) => return Err(ApiError::SessionExpired),
            Err(e) => {
                warn!(error = %e, "order submission failed");
                return Ok(SubmitOutcome::Failed {
                    notice: "Failed to place order. Please try again.".to_owned(),
                });
            }
        };

        // Success on either path consumes the buy-now record - for the
        // gateway path this happens before the redirect form is produced.
        if ready.used_buy_now {
            let _ = self.client.storage().remove(keys::DIRECT_CHECKOUT_ITEM);
        }

        match outcome {
            payment::OrderOutcome::Cod { order_id } => {
                Ok(SubmitOutcome::Confirmed { order_id })
            }
            payment::OrderOutcome::Online { params } => {
                Ok(SubmitOutcome::Gateway(GatewayRedirect {
                    action: self.gateway_url.clone(),
                    fields: params,
                }))
            }
        }
    }

    /// The buy-now record is a JSON array of cart items under a fixed
    /// key. A record that fails to parse is treated the same as a missing
    /// one.
    fn read_buy_now_record(&self) -> Option<Vec<CartItem>> {
        let raw = self
            .client
            .storage()
            .get(keys::DIRECT_CHECKOUT_ITEM)
            .ok()??;
        serde_json::from_str(&raw).ok()
    }
}

/// Write the buy-now record the product page hands to checkout.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized or persisted.
pub fn stage_buy_now(client: &ApiClient, items: &[CartItem]) -> Result<(), ApiError> {
    let raw = serde_json::to_string(items)?;
    client.storage().set(keys::DIRECT_CHECKOUT_ITEM, &raw)?;
    Ok(())
}
