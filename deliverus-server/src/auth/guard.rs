//! Authorization guard chain
//!
//! Each protected route declares an ordered list of [`Check`]s. The chain
//! runs as a `route_layer` before the body is read: the first failing check
//! short-circuits with its error and the handler never runs. Entities loaded
//! along the way are handed to the handler in a [`GuardContext`].
//!
//! ```ignore
//! const UPDATE: &[Check] = &[
//!     Check::Authenticated,
//!     Check::Role(OWNER),
//!     Check::RestaurantExists,
//!     Check::RestaurantOwned,
//! ];
//! Router::new()
//!     .route("/restaurants/{id}", put(update))
//!     .route_layer(middleware::from_fn(guard(state.clone(), UPDATE)));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use axum::extract::{FromRequestParts, Path, Request};
use axum::middleware::Next;
use axum::response::Response;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus, Product, Restaurant, User, UserType};

use crate::auth::{JwtError, JwtService};
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;

pub const OWNER: &[UserType] = &[UserType::Owner];
pub const CUSTOMER: &[UserType] = &[UserType::Customer];

/// One step of a guard chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Valid bearer token whose subject is a stored user
    Authenticated,
    /// Authenticated user has one of these types
    Role(&'static [UserType]),
    /// Path `{id}` names a restaurant
    RestaurantExists,
    /// Path `{id}` names a product (its restaurant is loaded too)
    ProductExists,
    /// Path `{id}` names an order
    OrderExists,
    /// Loaded restaurant belongs to the user
    RestaurantOwned,
    /// Loaded product's restaurant belongs to the user
    ProductOwned,
    /// Loaded order's restaurant belongs to the user
    OrderOwned,
    /// User placed the order or owns its restaurant
    OrderVisible,
    RestaurantHasNoOrders,
    ProductNotOrdered,
    OrderStatusIs(OrderStatus),
}

/// Entities loaded by the checks of a chain
#[derive(Debug, Clone, Default)]
pub struct GuardContext {
    pub user: Option<User>,
    pub restaurant: Option<Restaurant>,
    pub product: Option<Product>,
    pub order: Option<Order>,
}

fn misconfigured(what: &str) -> AppError {
    AppError::internal(format!("Guard chain did not load the {what}"))
}

impl GuardContext {
    pub fn user(&self) -> Result<&User, AppError> {
        self.user.as_ref().ok_or_else(AppError::unauthorized)
    }

    pub fn restaurant(&self) -> Result<&Restaurant, AppError> {
        self.restaurant
            .as_ref()
            .ok_or_else(|| misconfigured("restaurant"))
    }

    pub fn product(&self) -> Result<&Product, AppError> {
        self.product.as_ref().ok_or_else(|| misconfigured("product"))
    }

    pub fn order(&self) -> Result<&Order, AppError> {
        self.order.as_ref().ok_or_else(|| misconfigured("order"))
    }
}

/// Request data the checks look at
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardInput<'a> {
    /// Raw `Authorization` header value
    pub authorization: Option<&'a str>,
    /// Path `{id}`; `None` when absent or not an integer
    pub entity_id: Option<i64>,
}

/// Run `chain` in order, stopping at the first failure
pub async fn run_chain(
    state: &AppState,
    input: GuardInput<'_>,
    chain: &[Check],
) -> Result<GuardContext, AppError> {
    let mut ctx = GuardContext::default();
    for check in chain {
        if let Err(err) = apply(state, &input, &mut ctx, *check).await {
            security_log!(
                WARN,
                "guard_denied",
                check = ?check,
                code = %err.code,
                user_id = ctx.user.as_ref().map(|u| u.id),
                entity_id = input.entity_id
            );
            return Err(err);
        }
    }
    Ok(ctx)
}

async fn apply(
    state: &AppState,
    input: &GuardInput<'_>,
    ctx: &mut GuardContext,
    check: Check,
) -> Result<(), AppError> {
    match check {
        Check::Authenticated => {
            ctx.user = Some(authenticate(state, input.authorization).await?);
        }

        Check::Role(allowed) => {
            let user = ctx.user()?;
            if !allowed.contains(&user.user_type) {
                return Err(AppError::new(ErrorCode::RoleRequired)
                    .with_detail("userType", user.user_type.as_str()));
            }
        }

        Check::RestaurantExists => {
            let restaurant = match input.entity_id {
                Some(id) => state.restaurants.find_by_id(id).await.map_err(db)?,
                None => None,
            };
            ctx.restaurant =
                Some(restaurant.ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?);
        }

        Check::ProductExists => {
            let product = match input.entity_id {
                Some(id) => state.products.find_by_id(id).await.map_err(db)?,
                None => None,
            };
            let product = product.ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
            ctx.restaurant = state
                .restaurants
                .find_by_id(product.restaurant_id)
                .await
                .map_err(db)?;
            ctx.product = Some(product);
        }

        Check::OrderExists => {
            let order = match input.entity_id {
                Some(id) => state.orders.find_by_id(id).await.map_err(db)?,
                None => None,
            };
            let order = order.ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
            ctx.restaurant = state
                .restaurants
                .find_by_id(order.restaurant_id)
                .await
                .map_err(db)?;
            ctx.order = Some(order);
        }

        Check::RestaurantOwned => {
            ensure_owner(ctx.user()?, ctx.restaurant()?)?;
        }

        Check::ProductOwned => {
            ctx.product()?;
            ensure_owner(ctx.user()?, ctx.restaurant()?)?;
        }

        Check::OrderOwned => {
            ctx.order()?;
            ensure_owner(ctx.user()?, ctx.restaurant()?)?;
        }

        Check::OrderVisible => {
            let user = ctx.user()?;
            let order = ctx.order()?;
            let placed_it = order.user_id == user.id;
            let owns_it = ctx
                .restaurant
                .as_ref()
                .is_some_and(|r| r.is_owned_by(user.id));
            if !(placed_it || owns_it) {
                return Err(AppError::new(ErrorCode::NotOwner));
            }
        }

        Check::RestaurantHasNoOrders => {
            let restaurant = ctx.restaurant()?;
            if state
                .orders
                .exists_for_restaurant(restaurant.id)
                .await
                .map_err(db)?
            {
                return Err(AppError::new(ErrorCode::RestaurantHasOrders));
            }
        }

        Check::ProductNotOrdered => {
            let product = ctx.product()?;
            if state.products.is_ordered(product.id).await.map_err(db)? {
                return Err(AppError::new(ErrorCode::ProductHasOrders));
            }
        }

        Check::OrderStatusIs(expected) => {
            let order = ctx.order()?;
            if order.status != expected {
                let code = match expected {
                    OrderStatus::Pending => ErrorCode::OrderNotPending,
                    OrderStatus::Confirmed => ErrorCode::OrderNotConfirmed,
                    OrderStatus::Sent => ErrorCode::OrderNotSent,
                    OrderStatus::Delivered => ErrorCode::Conflict,
                };
                return Err(AppError::new(code).with_detail("status", order.status.as_str()));
            }
        }
    }
    Ok(())
}

fn db(err: crate::db::RepoError) -> AppError {
    ServiceError::from(err).into()
}

fn ensure_owner(user: &User, restaurant: &Restaurant) -> Result<(), AppError> {
    if restaurant.is_owned_by(user.id) {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::NotOwner))
    }
}

/// Resolve the bearer token to a stored user
pub async fn authenticate(state: &AppState, authorization: Option<&str>) -> Result<User, AppError> {
    let Some(header) = authorization else {
        return Err(AppError::unauthorized());
    };
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;
    user_for_token(state, token).await
}

/// Account behind a bare token; 401 when it is expired, forged or orphaned
pub async fn user_for_token(state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = state.jwt.validate_token(token).map_err(|e| match e {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::invalid_token("Malformed token subject"))?;

    state
        .users
        .find_by_id(user_id)
        .await
        .map_err(db)?
        .ok_or_else(AppError::unauthorized)
}

/// Guard middleware for `middleware::from_fn`
///
/// Reads the `Authorization` header and the `{id}` path parameter, runs the
/// chain and stores the resulting [`GuardContext`] in the request extensions.
pub fn guard(
    state: AppState,
    chain: &'static [Check],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        let state = state.clone();
        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let entity_id = Path::<HashMap<String, String>>::from_request_parts(&mut parts, &())
                .await
                .ok()
                .and_then(|Path(params)| params.get("id").and_then(|id| id.parse().ok()));
            let authorization = parts
                .headers
                .get(http::header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            let input = GuardInput {
                authorization,
                entity_id,
            };
            let ctx = run_chain(&state, input, chain).await?;

            parts.extensions.insert(ctx);
            Ok(next.run(Request::from_parts(parts, body)).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{
        MemoryStore, OrderRepository, ProductRepository, RestaurantRepository, UserRepository,
    };
    use rust_decimal::Decimal;
    use shared::models::{
        NewOrder, NewProduct, NewRestaurant, NewUser, OrderLine, RestaurantStatus,
    };

    struct Fixture {
        state: AppState,
        store: MemoryStore,
        owner: User,
        other_owner: User,
        customer: User,
        restaurant: Restaurant,
        product: Product,
    }

    fn bearer(state: &AppState, user: &User) -> String {
        let issued = state.jwt.generate_token(user.id, user.user_type).unwrap();
        format!("Bearer {}", issued.token)
    }

    async fn user(store: &MemoryStore, email: &str, user_type: UserType) -> User {
        UserRepository::create(
            store,
            NewUser {
                first_name: "Test".into(),
                last_name: "User".into(),
                email: email.into(),
                phone: "600".into(),
                address: "Calle".into(),
                postal_code: "41001".into(),
                avatar: None,
                user_type,
                password_hash: "x".into(),
            },
        )
        .await
        .unwrap()
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let state = AppState::with_store(store.clone(), Config::development());
        let owner = user(&store, "owner@x.es", UserType::Owner).await;
        let other_owner = user(&store, "other@x.es", UserType::Owner).await;
        let customer = user(&store, "customer@x.es", UserType::Customer).await;

        let restaurant = RestaurantRepository::create(
            &store,
            NewRestaurant {
                name: "Casa".into(),
                description: None,
                address: "Calle".into(),
                postal_code: "41001".into(),
                url: None,
                shipping_costs: Decimal::ONE,
                email: None,
                phone: None,
                status: RestaurantStatus::Online,
                percentage: Decimal::ZERO,
                pinned_at: None,
                user_id: owner.id,
            },
        )
        .await
        .unwrap();

        let product = ProductRepository::create(
            &store,
            NewProduct {
                restaurant_id: restaurant.id,
                name: "Tapa".into(),
                description: None,
                base_price: Decimal::TWO,
                availability: true,
                visible_until: None,
                order: None,
            },
        )
        .await
        .unwrap();

        Fixture {
            state,
            store,
            owner,
            other_owner,
            customer,
            restaurant,
            product,
        }
    }

    async fn place_order(f: &Fixture) -> Order {
        OrderRepository::create(
            &f.store,
            NewOrder {
                restaurant_id: f.restaurant.id,
                user_id: f.customer.id,
                address: "Calle".into(),
                shipping_costs: Decimal::ONE,
                price: Decimal::from(3),
                lines: vec![OrderLine {
                    product_id: f.product.id,
                    quantity: 1,
                    unit_price: Decimal::TWO,
                }],
            },
        )
        .await
        .unwrap()
    }

    const RESTAURANT_DELETE: &[Check] = &[
        Check::Authenticated,
        Check::Role(OWNER),
        Check::RestaurantExists,
        Check::RestaurantOwned,
        Check::RestaurantHasNoOrders,
    ];

    async fn code_of(f: &Fixture, auth: Option<&str>, id: Option<i64>, chain: &[Check]) -> ErrorCode {
        let input = GuardInput {
            authorization: auth,
            entity_id: id,
        };
        run_chain(&f.state, input, chain).await.unwrap_err().code
    }

    #[tokio::test]
    async fn test_full_chain_passes_and_loads_entities() {
        let f = fixture().await;
        let auth = bearer(&f.state, &f.owner);
        let ctx = run_chain(
            &f.state,
            GuardInput {
                authorization: Some(&auth),
                entity_id: Some(f.restaurant.id),
            },
            RESTAURANT_DELETE,
        )
        .await
        .unwrap();

        assert_eq!(ctx.user().unwrap().id, f.owner.id);
        assert_eq!(ctx.restaurant().unwrap().id, f.restaurant.id);
    }

    #[tokio::test]
    async fn test_first_failure_wins() {
        let f = fixture().await;
        let customer = bearer(&f.state, &f.customer);
        let other = bearer(&f.state, &f.other_owner);

        // no token: authentication fails before anything else, even for a missing entity
        assert_eq!(
            code_of(&f, None, Some(9999), RESTAURANT_DELETE).await,
            ErrorCode::NotAuthenticated
        );
        // role before existence
        assert_eq!(
            code_of(&f, Some(&customer), Some(9999), RESTAURANT_DELETE).await,
            ErrorCode::RoleRequired
        );
        // existence before ownership
        assert_eq!(
            code_of(&f, Some(&other), Some(9999), RESTAURANT_DELETE).await,
            ErrorCode::RestaurantNotFound
        );
        // ownership before state
        place_order(&f).await;
        assert_eq!(
            code_of(&f, Some(&other), Some(f.restaurant.id), RESTAURANT_DELETE).await,
            ErrorCode::NotOwner
        );
    }

    #[tokio::test]
    async fn test_restaurant_with_orders_conflicts() {
        let f = fixture().await;
        place_order(&f).await;
        let owner = bearer(&f.state, &f.owner);
        assert_eq!(
            code_of(&f, Some(&owner), Some(f.restaurant.id), RESTAURANT_DELETE).await,
            ErrorCode::RestaurantHasOrders
        );
    }

    #[tokio::test]
    async fn test_token_problems() {
        let f = fixture().await;
        let chain = &[Check::Authenticated];
        assert_eq!(
            code_of(&f, Some("Bearer nope"), None, chain).await,
            ErrorCode::TokenInvalid
        );
        assert_eq!(
            code_of(&f, Some("Token abc"), None, chain).await,
            ErrorCode::TokenInvalid
        );

        // token for a user that was never stored
        let ghost = f.state.jwt.generate_token(4242, UserType::Owner).unwrap();
        let auth = format!("Bearer {}", ghost.token);
        assert_eq!(
            code_of(&f, Some(&auth), None, chain).await,
            ErrorCode::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn test_product_chain() {
        let f = fixture().await;
        let chain = &[
            Check::Authenticated,
            Check::Role(OWNER),
            Check::ProductExists,
            Check::ProductOwned,
            Check::ProductNotOrdered,
        ];
        let other = bearer(&f.state, &f.other_owner);
        let owner = bearer(&f.state, &f.owner);

        assert_eq!(
            code_of(&f, Some(&owner), None, chain).await,
            ErrorCode::ProductNotFound
        );
        assert_eq!(
            code_of(&f, Some(&other), Some(f.product.id), chain).await,
            ErrorCode::NotOwner
        );
        place_order(&f).await;
        assert_eq!(
            code_of(&f, Some(&owner), Some(f.product.id), chain).await,
            ErrorCode::ProductHasOrders
        );
    }

    #[tokio::test]
    async fn test_order_status_and_visibility() {
        let f = fixture().await;
        let order = place_order(&f).await;
        let owner = bearer(&f.state, &f.owner);
        let customer = bearer(&f.state, &f.customer);
        let other = bearer(&f.state, &f.other_owner);

        let send = &[
            Check::Authenticated,
            Check::Role(OWNER),
            Check::OrderExists,
            Check::OrderOwned,
            Check::OrderStatusIs(OrderStatus::Confirmed),
        ];
        assert_eq!(
            code_of(&f, Some(&owner), Some(order.id), send).await,
            ErrorCode::OrderNotConfirmed
        );

        let show = &[Check::Authenticated, Check::OrderExists, Check::OrderVisible];
        for auth in [&owner, &customer] {
            let input = GuardInput {
                authorization: Some(auth),
                entity_id: Some(order.id),
            };
            assert!(run_chain(&f.state, input, show).await.is_ok());
        }
        assert_eq!(
            code_of(&f, Some(&other), Some(order.id), show).await,
            ErrorCode::NotOwner
        );
    }

    #[tokio::test]
    async fn test_missing_prerequisite_is_internal() {
        let f = fixture().await;
        let owner = bearer(&f.state, &f.owner);
        let chain = &[Check::Authenticated, Check::RestaurantOwned];
        assert_eq!(
            code_of(&f, Some(&owner), Some(f.restaurant.id), chain).await,
            ErrorCode::InternalError
        );
    }
}
