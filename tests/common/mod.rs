//! Shared utilities for integration testing.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use grpc_gateway::config::GatewayConfig;
use grpc_gateway::rpc::{Greeter, GreetRequest, GreetResponse};
use grpc_gateway::{HttpServer, RouteTable};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::ProstCodec;
use tonic::codegen::{empty_body, http, Body, Service, StdError};
use tonic::metadata::MetadataMap;
use tonic::server::{NamedService, UnaryService};
use tonic::{Code, Request, Response, Status};

/// In-process stand-in for the remote greeter service.
pub struct MockGreeter {
    calls: AtomicUsize,
    failure: Option<(Code, &'static str)>,
    last: Mutex<Option<(GreetRequest, MetadataMap)>>,
}

#[allow(dead_code)]
impl MockGreeter {
    /// Answers `Hello <name>`.
    pub fn hello() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failure: None,
            last: Mutex::new(None),
        })
    }

    /// Fails every call with `code`.
    pub fn failing(code: Code, message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failure: Some((code, message)),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Metadata of the most recent call.
    pub fn last_metadata(&self) -> Option<MetadataMap> {
        self.last.lock().unwrap().as_ref().map(|(_, m)| m.clone())
    }

    /// Message of the most recent call.
    pub fn last_request(&self) -> Option<GreetRequest> {
        self.last.lock().unwrap().as_ref().map(|(r, _)| r.clone())
    }
}

impl Greeter for MockGreeter {
    fn greet(
        &self,
        request: Request<GreetRequest>,
    ) -> BoxFuture<'static, Result<Response<GreetResponse>, Status>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let metadata = request.metadata().clone();
        let message = request.into_inner();
        *self.last.lock().unwrap() = Some((message.clone(), metadata));

        let result = match self.failure {
            Some((code, text)) => Err(Status::new(code, text)),
            None => Ok(Response::new(GreetResponse {
                message: format!("Hello {}", message.name),
            })),
        };
        Box::pin(async move { result })
    }
}

/// Config pointing the docs routes at the repository's assets.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.docs.swagger_json =
        concat!(env!("CARGO_MANIFEST_DIR"), "/proto/greeter.swagger.json").into();
    config.docs.swagger_ui_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/swagger-ui").into();
    config
}

/// Start a gateway backed by `greeter` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_gateway<G: Greeter>(greeter: Arc<G>) -> SocketAddr {
    start_gateway_with(RouteTable::greeter(greeter)).await
}

/// Start a gateway serving `routes` on an ephemeral port.
pub async fn start_gateway_with(routes: RouteTable) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(test_config(), routes);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_port() -> SocketAddr {
    let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = reserved.local_addr().unwrap();
    drop(reserved);
    addr
}

/// Serves any [`Greeter`] as the `greeter.Greeter` gRPC service.
#[allow(dead_code)]
pub struct GreeterServer<G> {
    inner: Arc<G>,
}

#[allow(dead_code)]
impl<G> GreeterServer<G> {
    pub fn new(inner: Arc<G>) -> Self {
        Self { inner }
    }
}

impl<G> Clone for GreeterServer<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<G> NamedService for GreeterServer<G> {
    const NAME: &'static str = "greeter.Greeter";
}

#[allow(dead_code)]
struct GreetMethod<G>(Arc<G>);

impl<G: Greeter> UnaryService<GreetRequest> for GreetMethod<G> {
    type Response = GreetResponse;
    type Future = BoxFuture<'static, Result<Response<GreetResponse>, Status>>;

    fn call(&mut self, request: Request<GreetRequest>) -> Self::Future {
        self.0.greet(request)
    }
}

impl<G, B> Service<http::Request<B>> for GreeterServer<G>
where
    G: Greeter,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        let inner = self.inner.clone();
        if request.uri().path() != "/greeter.Greeter/Greet" {
            return Box::pin(async move {
                Ok::<_, Infallible>(http::Response::builder()
                    .header("grpc-status", (Code::Unimplemented as i32).to_string())
                    .header("content-type", "application/grpc")
                    .body(empty_body())
                    .unwrap())
            });
        }

        Box::pin(async move {
            let codec: ProstCodec<GreetResponse, GreetRequest> = ProstCodec::default();
            let mut grpc = tonic::server::Grpc::new(codec);
            Ok::<_, Infallible>(grpc.unary(GreetMethod(inner), request).await)
        })
    }
}

/// Start a real gRPC server for `greeter` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_upstream<G: Greeter>(greeter: Arc<G>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(GreeterServer::new(greeter))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    addr
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
