//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                                                        │
//! │                                                                         │
//! │  POST   /produtos                    create product         201        │
//! │  GET    /produtos                    list all (cached)                 │
//! │  GET    /produtos/ativos             list active                       │
//! │  GET    /produtos/{id}               fetch                             │
//! │  PUT    /produtos/{id}               full update                       │
//! │  PATCH  /produtos/{id}/inativar      deactivate             204        │
//! │                                                                         │
//! │  POST   /vendas                      record sale            201        │
//! │  GET    /vendas                      list all (cached)                 │
//! │  GET    /vendas/{id}                 fetch                             │
//! │  PUT    /vendas/{id}                 replace items                     │
//! │  DELETE /vendas/{id}                 delete                 204        │
//! │                                                                         │
//! │  GET    /vendas/relatorio/data?startDate=&endDate=                     │
//! │  GET    /vendas/relatorio/mes?ano=&mes=                                │
//! │  GET    /vendas/relatorio/semana-atual                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers take extractors as `Result<_, Rejection>` so malformed input
//! becomes an [`ApiError`](crate::error::ApiError) with the usual body.

mod health;
mod product;
mod report;
mod sale;

#[cfg(test)]
mod tests;

use axum::routing::{get, patch};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::{attach_error_path, panic_response, route_not_found};
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/produtos", get(product::list_all).post(product::create))
        .route("/produtos/ativos", get(product::list_active))
        .route("/produtos/{id}", get(product::get).put(product::update))
        .route("/produtos/{id}/inativar", patch(product::deactivate))
        .route("/vendas", get(sale::list_all).post(sale::create))
        .route(
            "/vendas/{id}",
            get(sale::get).put(sale::update).delete(sale::delete),
        )
        .route("/vendas/relatorio/data", get(report::by_date))
        .route("/vendas/relatorio/mes", get(report::by_month))
        .route("/vendas/relatorio/semana-atual", get(report::current_week));

    with_layers(routes).with_state(state)
}

/// Fallback and middleware shared by every route. A panic becomes a 500
/// body before `attach_error_path` adds the path to it.
fn with_layers(routes: Router<AppState>) -> Router<AppState> {
    routes
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(attach_error_path))
        .layer(TraceLayer::new_for_http())
}
