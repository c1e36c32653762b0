pub mod error;
mod health;
pub mod state;

use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `/health` and other process-level routes.
pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    OpenApiRouter::<S>::new().routes(routes!(health::health_handler))
}
