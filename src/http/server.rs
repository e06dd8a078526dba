//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with docs routes and the translator fallback
//! - Wire up middleware (request ID, tracing, CORS)
//! - Bind server to listener
//! - Dispatch requests to the route table
//! - Invoke the remote procedure and render its result
//!
//! # Design Decisions
//! - The translator is the router fallback: anything that is not a docs asset
//!   is looked up in the route table
//! - CORS wraps every response, including docs and errors
//! - Dropping the handler future (client gone) drops the in-flight call

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::docs;
use crate::http::middleware::allow_cors;
use crate::http::request::{call_timeout, forwarded_metadata, request_id, MakeRequestUuid};
use crate::http::translate::build_message;
use crate::observability::metrics;
use crate::observability::tracing::RequestSpan;
use crate::routing::{CallInput, RouteMatch, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub max_body_bytes: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes`.
    pub fn new(config: GatewayConfig, routes: RouteTable) -> Self {
        tracing::info!(routes = routes.len(), "Route table built");
        for route in routes.routes() {
            tracing::debug!(
                method = %route.method,
                pattern = route.pattern.as_str(),
                procedure = route.procedure,
                "Route registered"
            );
        }

        let state = AppState {
            routes: Arc::new(routes),
            max_body_bytes: config.translator.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new();
        if config.docs.enabled {
            router = router.merge(docs::routes(&config.docs));
        }

        router
            .fallback(gateway_handler)
            .with_state(state)
            .layer(middleware::from_fn(allow_cors))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Only returns when the listener fails.
    pub async fn run(self, listener: TcpListener) -> Result<(), GatewayError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Starting gRPC gateway");
        if self.config.docs.enabled {
            tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
        }

        axum::serve(listener, self.router).await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the gateway without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Translator handler.
/// Looks up the route, decodes the input, calls the remote procedure.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    let Some(route_match) = state.routes.match_request(&method, &path) else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return GatewayError::RouteNotFound { method, path }.into_response();
    };
    let procedure = route_match.route.procedure;

    tracing::debug!(
        request_id = %request_id,
        procedure = procedure,
        "Forwarding request"
    );

    let response = match invoke(route_match, request, state.max_body_bytes).await {
        Ok(output) => Json(output).into_response(),
        Err(e) => {
            match &e {
                GatewayError::RemoteCall(status) => tracing::warn!(
                    request_id = %request_id,
                    procedure = procedure,
                    code = ?status.code(),
                    message = status.message(),
                    "Remote call failed"
                ),
                other => tracing::info!(
                    request_id = %request_id,
                    procedure = procedure,
                    error = %other,
                    "Rejected request"
                ),
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), procedure, start_time);
    response
}

/// Decode the request for the matched route and make the call.
async fn invoke(
    route_match: RouteMatch<'_>,
    request: Request<Body>,
    max_body_bytes: usize,
) -> Result<Value, GatewayError> {
    let (parts, body) = request.into_parts();
    let timeout = call_timeout(&parts.headers)?;
    let metadata = forwarded_metadata(&parts.headers);

    let message = build_message(
        route_match.route.body,
        &route_match.captures,
        route_match.route.query_fields,
        parts.uri.query(),
        body,
        max_body_bytes,
    )
    .await?;

    (route_match.route.invoke)(CallInput {
        message,
        metadata,
        timeout,
    })
    .await
}
