//! Storefront endpoints: catalog reads, login, cart actions and flash-sale admission.
//!
//! Two routes carry everything, dispatched on query parameters (`GET /get`)
//! or on the JSON body (`POST /post`), matching what the load scripts send.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use cart::{CartLineItem, CartService, SessionToken, TokenIssuer, parse_quantity, parse_token};
use catalog::{Catalog, Product};
use common::ProductId;
use flash_sale::{Admission, FlashSaleController};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub carts: CartService,
    pub flash_sale: FlashSaleController,
    pub catalog: Catalog,
    pub tokens: TokenIssuer,
}

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
    pub product_id: Option<String>,
    pub flash_sale_product: Option<String>,
    pub search: Option<String>,
    pub action: Option<String>,
}

impl GetParams {
    /// Drops parameters sent with an empty value, so `?product_id=` falls
    /// through to the next lookup.
    fn without_empty_values(self) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            product_id: present(self.product_id),
            flash_sale_product: present(self.flash_sale_product),
            search: present(self.search),
            action: self.action,
        }
    }
}

/// Product id as sent by clients: a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductIdInput {
    Number(u64),
    Text(String),
}

impl From<ProductIdInput> for ProductId {
    fn from(input: ProductIdInput) -> Self {
        match input {
            ProductIdInput::Number(n) => ProductId::from(n),
            ProductIdInput::Text(s) => ProductId::from(s),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub action: Option<String>,
    pub product_id: Option<ProductIdInput>,
    pub quantity: Option<u32>,
    pub session_token: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ProductResponse<'a> {
    pub product_id: String,
    pub product: Option<&'a Product>,
}

#[derive(Serialize)]
pub struct FlashSaleProductResponse {
    pub product_id: String,
    pub name: &'static str,
    pub stock: u32,
}

#[derive(Serialize)]
pub struct SearchResponse<'a> {
    pub query: String,
    pub results: Vec<&'a Product>,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub session_token: Option<SessionToken>,
    pub cart: Vec<CartLineItem>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub session_token: SessionToken,
}

#[derive(Serialize)]
pub struct AddToCartResponse {
    pub message: &'static str,
    pub items_in_cart: usize,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub items: Vec<CartLineItem>,
}

#[derive(Serialize)]
pub struct QuickAddResponse {
    pub message: &'static str,
    pub product_id: ProductId,
}

// -- Handlers --

/// GET /get — product lookup, flash-sale stock, search, cart view or welcome.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<GetParams>,
) -> Response {
    let params = params.without_empty_values();

    if let Some(product_id) = params.product_id {
        let product = state.catalog.get(&ProductId::new(product_id.as_str()));
        return Json(ProductResponse {
            product_id,
            product,
        })
        .into_response();
    }

    if let Some(product_id) = params.flash_sale_product {
        let stock = state
            .flash_sale
            .remaining(&ProductId::new(product_id.as_str()))
            .unwrap_or(0);
        return Json(FlashSaleProductResponse {
            product_id,
            name: "Flash Sale Product",
            stock,
        })
        .into_response();
    }

    if let Some(query) = params.search {
        let results = state.catalog.search(&query);
        return Json(SearchResponse { query, results }).into_response();
    }

    if params.action.as_deref() == Some("view_cart") {
        let token = bearer_token(&headers).and_then(SessionToken::parse);
        let cart = state.carts.view_cart(token.as_ref());
        return Json(CartResponse {
            session_token: token,
            cart,
        })
        .into_response();
    }

    Json(MessageResponse {
        message: "Welcome to E-commerce API!",
    })
    .into_response()
}

/// POST /post — login, add to cart, checkout or flash-sale quick add.
#[tracing::instrument(skip(state, headers, req))]
pub async fn post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PostRequest>,
) -> Result<Response, ApiError> {
    // A body carrying only one credential is not a login attempt.
    if req.username.is_some() && req.password.is_some() {
        return login(&state, &req);
    }

    match req.action.as_deref() {
        Some("add_to_cart") => add_to_cart(&state, &headers, &req),
        Some("checkout") => Ok(checkout(&state, &headers, &req)),
        Some("quick_add") => quick_add(&state, &req),
        other => {
            tracing::debug!(action = ?other, "unknown POST action");
            Err(ApiError::BadRequest("Unknown POST action".to_string()))
        }
    }
}

fn login(state: &AppState, req: &PostRequest) -> Result<Response, ApiError> {
    let username = req.username.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    let session_token = state
        .tokens
        .issue(username, password)
        .ok_or_else(|| ApiError::Unauthorized("Username and password are required".to_string()))?;

    tracing::info!(%session_token, "session issued");
    Ok(Json(LoginResponse {
        message: "Login successful",
        session_token,
    })
    .into_response())
}

fn add_to_cart(
    state: &AppState,
    headers: &HeaderMap,
    req: &PostRequest,
) -> Result<Response, ApiError> {
    let token = parse_token(
        req.session_token
            .as_deref()
            .or_else(|| bearer_token(headers)),
    )?;
    let product_id: ProductId = req
        .product_id
        .clone()
        .ok_or_else(|| ApiError::BadRequest("product_id is required".to_string()))?
        .into();
    let quantity = parse_quantity(req.quantity.unwrap_or(1))?;

    let items_in_cart = state.carts.add_to_cart(&token, product_id, quantity);

    Ok(Json(AddToCartResponse {
        message: "Item added to cart",
        items_in_cart,
    })
    .into_response())
}

fn checkout(state: &AppState, headers: &HeaderMap, req: &PostRequest) -> Response {
    let token = req
        .session_token
        .as_deref()
        .or_else(|| bearer_token(headers))
        .and_then(SessionToken::parse);
    let items = state.carts.checkout(token.as_ref());

    Json(CheckoutResponse {
        message: "Checkout successful",
        items,
    })
    .into_response()
}

fn quick_add(state: &AppState, req: &PostRequest) -> Result<Response, ApiError> {
    let product_id: ProductId = req
        .product_id
        .clone()
        .ok_or_else(|| ApiError::BadRequest("product_id is required".to_string()))?
        .into();

    let response = match state.flash_sale.try_grant_unit(&product_id) {
        Admission::Granted => (
            StatusCode::OK,
            Json(QuickAddResponse {
                message: "Flash sale item added",
                product_id,
            }),
        ),
        Admission::Denied => (
            StatusCode::CONFLICT,
            Json(QuickAddResponse {
                message: "Out of stock",
                product_id,
            }),
        ),
    };
    Ok(response.into_response())
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_once(' ')
        .map(|(_, token)| token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok1"));
        assert_eq!(bearer_token(&headers), Some("tok1"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("tok1"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_product_id_accepts_numbers_and_strings() {
        let req: PostRequest =
            serde_json::from_str(r#"{"action":"quick_add","product_id":999}"#).unwrap();
        assert_eq!(
            ProductId::from(req.product_id.unwrap()),
            ProductId::new("999")
        );

        let req: PostRequest =
            serde_json::from_str(r#"{"action":"quick_add","product_id":"999"}"#).unwrap();
        assert_eq!(
            ProductId::from(req.product_id.unwrap()),
            ProductId::new("999")
        );
    }

    #[test]
    fn test_empty_get_params_are_dropped() {
        let params = GetParams {
            product_id: Some(String::new()),
            flash_sale_product: Some(String::new()),
            search: Some("lap".to_string()),
            action: None,
        }
        .without_empty_values();

        assert_eq!(params.product_id, None);
        assert_eq!(params.flash_sale_product, None);
        assert_eq!(params.search.as_deref(), Some("lap"));
    }

    #[test]
    fn test_post_request_ignores_unknown_fields() {
        let req: PostRequest = serde_json::from_str(
            r#"{"action":"checkout","payment_method":"credit_card","session_token":"t"}"#,
        )
        .unwrap();
        assert_eq!(req.action.as_deref(), Some("checkout"));
        assert_eq!(req.session_token.as_deref(), Some("t"));
    }
}
