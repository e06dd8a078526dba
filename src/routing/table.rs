//! Route table: (method, path template) → remote procedure.
//!
//! # Responsibilities
//! - Hold the routes, built once at startup
//! - Look up the route for a request, with path captures
//! - Bind each route to a typed unary invoker
//!
//! # Design Decisions
//! - Built by explicit construction; nothing registers itself globally
//! - Immutable after construction (shared via Arc, no locks)
//! - First match wins, in declaration order
//! - Invokers decode the JSON input into the typed message *before* calling,
//!   so malformed input never reaches the remote service

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use futures_util::future::{self, BoxFuture};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};

use crate::error::GatewayError;
use crate::routing::pattern::PathPattern;
use crate::rpc::greeter::{GreetRequest, Greeter, GREET_PROCEDURE, GREET_REQUEST_FIELDS};

/// Where the request body goes in the input message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    /// The whole body is the input message (`body: "*"`); query is ignored.
    Whole,
    /// No body; fields come from the path and query string.
    None,
}

/// Everything a unary call needs besides the route itself.
#[derive(Debug, Default)]
pub struct CallInput {
    /// Input message as JSON, before typed decoding.
    pub message: Value,
    /// Metadata forwarded to the remote service.
    pub metadata: MetadataMap,
    /// Deadline requested by the client.
    pub timeout: Option<Duration>,
}

/// Type-erased unary call: JSON in, JSON out.
pub type Invoker =
    Arc<dyn Fn(CallInput) -> BoxFuture<'static, Result<Value, GatewayError>> + Send + Sync>;

/// Wrap a typed unary call into an [`Invoker`].
pub fn unary<M, R, F>(call: F) -> Invoker
where
    M: DeserializeOwned + Send + 'static,
    R: Serialize + Send + 'static,
    F: Fn(Request<M>) -> BoxFuture<'static, Result<Response<R>, Status>> + Send + Sync + 'static,
{
    Arc::new(move |input: CallInput| -> BoxFuture<'static, Result<Value, GatewayError>> {
        let message: M = match serde_json::from_value(input.message) {
            Ok(message) => message,
            Err(e) => return Box::pin(future::ready(Err(GatewayError::invalid_argument(e)))),
        };

        let mut request = Request::new(message);
        *request.metadata_mut() = input.metadata;
        if let Some(timeout) = input.timeout {
            request.set_timeout(timeout);
        }

        let call = call(request);
        Box::pin(async move {
            let response = call.await?;
            serde_json::to_value(response.into_inner()).map_err(|e| {
                GatewayError::RemoteCall(Status::internal(format!(
                    "failed to encode response: {}",
                    e
                )))
            })
        })
    })
}

/// A single route.
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    /// Fully qualified procedure name, for logs and metrics.
    pub procedure: &'static str,
    pub body: BodyRule,
    /// Message fields settable from the query string.
    pub query_fields: &'static [&'static str],
    pub invoke: Invoker,
}

impl Route {
    pub fn new(
        method: Method,
        template: &str,
        procedure: &'static str,
        body: BodyRule,
        invoke: Invoker,
    ) -> Self {
        Self {
            method,
            pattern: PathPattern::parse(template),
            procedure,
            body,
            query_fields: &[],
            invoke,
        }
    }

    /// Accept `fields` from the query string; other keys are ignored.
    pub fn with_query_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.query_fields = fields;
        self
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("procedure", &self.procedure)
            .field("body", &self.body)
            .field("query_fields", &self.query_fields)
            .finish()
    }
}

/// A matched route plus its path captures.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub captures: Vec<(String, String)>,
}

/// Immutable route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Routes for the `greeter.Greeter` service.
    ///
    /// ```text
    /// POST /v1/example          body: *     → Greet
    /// GET  /v1/example/{name}   body: none  → Greet
    /// ```
    pub fn greeter(client: Arc<dyn Greeter>) -> Self {
        let greet = unary(move |request: Request<GreetRequest>| client.greet(request));

        Self::new(vec![
            Route::new(
                Method::POST,
                "/v1/example",
                GREET_PROCEDURE,
                BodyRule::Whole,
                greet.clone(),
            ),
            Route::new(
                Method::GET,
                "/v1/example/{name}",
                GREET_PROCEDURE,
                BodyRule::None,
                greet,
            )
            .with_query_fields(GREET_REQUEST_FIELDS),
        ])
    }

    /// Find the first route matching `method` and `path`.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|captures| RouteMatch { route, captures })
            })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
