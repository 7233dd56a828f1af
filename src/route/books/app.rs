use axum::{routing::get, Router};

use crate::state::ApiState;

/// Collection route: GET list, POST create. Item route: GET, PUT, DELETE,
/// keyed by the `id` path parameter.
pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/",
            get(super::list_books::list_books).post(super::create_book::create_book),
        )
        .route(
            "/:id",
            get(super::get_book::get_book)
                .put(super::update_book::update_book)
                .delete(super::delete_book::delete_book),
        )
}
