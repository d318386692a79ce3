#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use shortlink::application::services::{
    LimiterPolicy, LinkCache, LinkService, RateLimiter,
};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::cache::{CacheService, MemoryCache};
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::infrastructure::rate_limit::{CounterStore, InMemoryCounterStore};
use shortlink::routes::app_router;
use shortlink::state::AppState;
use shortlink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const ENDPOINT: &str = "http://localhost:8080/";

/// Limit high enough that functional tests never trip it.
pub const UNLIMITED: u64 = 1_000_000;

#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.parse().unwrap(),
        }
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// Knobs for a test application.
pub struct TestOptions {
    pub max_requests: u64,
    pub window: Duration,
    pub policy: LimiterPolicy,
    pub behind_proxy: bool,
    pub request_timeout: Duration,
    pub peer: &'static str,
    pub counters: Arc<dyn CounterStore>,
    pub repository: Option<Arc<dyn LinkRepository>>,
    pub generator: Arc<dyn CodeGenerator>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            max_requests: UNLIMITED,
            window: Duration::from_secs(60),
            policy: LimiterPolicy::FailClosed,
            behind_proxy: false,
            request_timeout: Duration::from_secs(10),
            peer: "127.0.0.1:12345",
            counters: Arc::new(InMemoryCounterStore::new()),
            repository: None,
            generator: Arc::new(RandomCodeGenerator),
        }
    }
}

/// Application wired to in-memory gateways, with handles for inspection.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub repository: Arc<InMemoryLinkRepository>,
    pub cache: Arc<MemoryCache>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(TestOptions::default())
}

pub fn create_test_app_with(options: TestOptions) -> TestApp {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(MemoryCache::new());

    let state = build_state(&options, repository.clone(), cache.clone());

    let app: Router = app_router(state.clone()).layer(MockConnectInfoLayer::new(options.peer));
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        state,
        repository,
        cache,
    }
}

pub fn build_state(
    options: &TestOptions,
    repository: Arc<InMemoryLinkRepository>,
    cache: Arc<MemoryCache>,
) -> AppState {
    let link_repository: Arc<dyn LinkRepository> = match &options.repository {
        Some(custom) => custom.clone(),
        None => repository,
    };
    let cache: Arc<dyn CacheService> = cache;

    let link_service = Arc::new(LinkService::new(
        link_repository,
        options.generator.clone(),
        LinkCache::new(cache, Duration::from_secs(60)),
        10,
    ));
    let rate_limiter = Arc::new(RateLimiter::new(
        options.counters.clone(),
        options.max_requests,
        options.window,
        options.policy,
    ));

    AppState::new(
        link_service,
        rate_limiter,
        ENDPOINT,
        options.behind_proxy,
        options.request_timeout,
    )
}

/// Extracts the code from a `shortUrl` returned by the API.
pub fn code_of(short_url: &str) -> &str {
    short_url.strip_prefix(ENDPOINT).unwrap()
}
