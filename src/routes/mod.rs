pub mod activities;
pub mod books;
pub mod carts;
pub mod comments;
pub mod health;
pub mod posts;
pub mod rentals;
pub mod users;
pub mod validation;

pub use activities::list_activities;
pub use books::{get_book, list_books};
pub use carts::{add_to_cart, get_cart, remove_from_cart};
pub use comments::{create_comment, delete_comment, get_comment};
pub use health::health_check;
pub use posts::{create_post, delete_post, get_post, list_posts};
pub use rentals::{checkout, pay_rental, rent_history};
pub use users::{current_user, login_user, register_user, topup};
pub use validation::{AppJson, AppPath};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Build the full route table
///
/// Routes that take an `AuthUser` require a bearer token; registration,
/// login, the catalog and the health check are open.
pub fn router(state: AppState) -> Router {
    let log_requests = state.config.log_requests;

    let router = Router::new()
        .route("/health", get(health_check))
        // Book rental
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user))
        .route("/users/me", get(current_user))
        .route("/users/topup", post(topup))
        .route(
            "/users/carts",
            get(get_cart).post(add_to_cart).delete(remove_from_cart),
        )
        .route("/users/checkout", post(checkout))
        .route("/users/rent-history", get(rent_history))
        .route("/users/rentals/:id/pay", post(pay_rental))
        .route("/books/all", get(list_books))
        .route("/books/:id", get(get_book))
        // Social posting
        .route("/posts", post(create_post).get(list_posts))
        .route("/posts/:id", get(get_post).delete(delete_post))
        .route("/comments", post(create_comment))
        .route("/comments/:id", get(get_comment).delete(delete_comment))
        .route("/activities", get(list_activities))
        .with_state(state);

    if log_requests {
        router.layer(middleware::from_fn(crate::middleware::log_requests))
    } else {
        router
    }
}
