//! The `greeter.Greeter` service: messages and client.
//!
//! Messages carry both the protobuf encoding (prost) used on the wire and the
//! JSON shape (serde) used on the HTTP side. Field names follow proto3 JSON
//! conventions: lowerCamelCase, default values omitted on output.

use axum::http::uri::PathAndQuery;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tonic::codec::ProstCodec;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Fully qualified name of the `Greet` procedure.
pub const GREET_PROCEDURE: &str = "greeter.Greeter/Greet";

/// JSON field names of [`GreetRequest`].
pub const GREET_REQUEST_FIELDS: &[&str] = &["name"];

/// Input of `Greeter.Greet`.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GreetRequest {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Output of `Greeter.Greet`.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GreetResponse {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Calls exposed by the greeter service.
///
/// The gateway only depends on this trait, so tests can swap the network
/// client for an in-process implementation.
pub trait Greeter: Send + Sync + 'static {
    /// Unary `Greet` call. Dropping the returned future cancels the call.
    fn greet(
        &self,
        request: Request<GreetRequest>,
    ) -> BoxFuture<'static, Result<Response<GreetResponse>, Status>>;
}

/// gRPC client for `greeter.Greeter` over a shared channel.
///
/// Cloning is cheap; every clone multiplexes onto the same connection.
#[derive(Debug, Clone)]
pub struct GreeterClient {
    inner: tonic::client::Grpc<Channel>,
}

impl GreeterClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }
}

impl Greeter for GreeterClient {
    fn greet(
        &self,
        request: Request<GreetRequest>,
    ) -> BoxFuture<'static, Result<Response<GreetResponse>, Status>> {
        let mut grpc = self.inner.clone();
        Box::pin(async move {
            grpc.ready()
                .await
                .map_err(|e| Status::unavailable(format!("service was not ready: {}", e)))?;

            let codec: ProstCodec<GreetRequest, GreetResponse> = ProstCodec::default();
            let path = PathAndQuery::from_static("/greeter.Greeter/Greet");
            grpc.unary(request, path, codec).await
        })
    }
}
