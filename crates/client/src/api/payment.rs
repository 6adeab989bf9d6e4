//! Order creation and payment-gateway plumbing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use clementine_core::{OrderId, PaymentMethod, ProductId};

use crate::error::ApiError;
use crate::http::ApiClient;

/// Body of `POST /payment/create-order`.
///
/// `direct_items` is present only for a buy-now checkout; when absent the
/// backend resolves items from the persisted cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission<A: Serialize> {
    pub address: A,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_items: Option<Vec<DirectItem>>,
}

/// One buy-now line, as the backend expects it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Raw wire shape of the order-creation response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    mode: Option<PaymentMethod>,
    #[serde(default)]
    order_id: Option<OrderId>,
    #[serde(default)]
    payu_params: Option<BTreeMap<String, String>>,
}

/// What a successful order creation means for the client, as an explicit
/// tagged union rather than a bag of optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The server already finalized the order; show the confirmation.
    Cod {
        order_id: OrderId,
    },
    /// Hand off to the gateway's hosted page with these form fields.
    Online {
        params: BTreeMap<String, String>,
    },
}

/// `POST /payment/create-order`
///
/// # Errors
///
/// - `ApiError::UnexpectedResponse` when the backend reports failure or a
///   success response is missing the fields its mode requires
/// - dispatcher errors otherwise
pub async fn create_order<A: Serialize>(
    client: &ApiClient,
    submission: &OrderSubmission<A>,
) -> Result<OrderOutcome, ApiError> {
    let response: CreateOrderResponse = client
        .post_json("/payment/create-order", submission)
        .await?;

    if !response.success {
        return Err(ApiError::UnexpectedResponse(
            response
                .message
                .unwrap_or_else(|| "order could not be placed".to_owned()),
        ));
    }

    match (response.mode, response.order_id, response.payu_params) {
        (Some(PaymentMethod::Cod), Some(order_id), _) => Ok(OrderOutcome::Cod { order_id }),
        (Some(PaymentMethod::Online), _, Some(params)) if !params.is_empty() => {
            Ok(OrderOutcome::Online { params })
        }
        _ => Err(ApiError::UnexpectedResponse(
            "order response missing fields for its payment mode".to_owned(),
        )),
    }
}

/// User-facing message for a gateway return-URL `reason` code.
#[must_use]
pub fn failure_reason_message(reason: &str) -> &'static str {
    match reason {
        "hash_mismatch" => "Payment verification failed. If you were charged, contact support.",
        "transaction_failed" => "The payment was declined by the gateway.",
        "order_not_found" => "We could not match the payment to an order. Contact support.",
        _ => "Payment failed. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_reasons_fall_back_to_generic() {
        assert_eq!(
            failure_reason_message("hash_mismatch"),
            "Payment verification failed. If you were charged, contact support."
        );
        assert_eq!(
            failure_reason_message("something_new"),
            "Payment failed. Please try again."
        );
    }

    #[test]
    fn cod_response_parses_to_cod_outcome() {
        let raw: CreateOrderResponse = serde_json::from_str(
            r#"{"success":true,"mode":"COD","orderId":"ord-7"}"#,
        )
        .unwrap();
        assert!(raw.success);
        assert_eq!(raw.mode, Some(PaymentMethod::Cod));
        assert_eq!(raw.order_id, Some(OrderId::new("ord-7")));
    }
}
