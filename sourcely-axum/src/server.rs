use std::future::Future;

use axum::extract::Request;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::{Router, middleware};
use tokio::signal;

use crate::i18n::handle_i18n;

pub struct WebServer {
    router: Router,
    addr: String,
    middlewares: Vec<Box<dyn FnOnce(Router) -> Router + Send>>,
}

impl WebServer {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            router: Router::new(),
            addr: addr.into(),
            middlewares: Vec::new(),
        }
    }

    pub fn layer_i18n(mut self) -> Self {
        self.middlewares.push(Box::new(|r| r.layer(from_fn(handle_i18n))));
        self
    }

    pub fn layer_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Clone + Send + Sync + 'static + Fn(Request, Next) -> Fut,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.middlewares.push(Box::new(|r| r.layer(middleware::from_fn(f))));
        self
    }

    pub fn mount(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// 中间件在最后统一套上，与调用 `mount` 的先后无关
    pub fn into_router(self) -> Router {
        self.middlewares
            .into_iter()
            .fold(self.router, |router, m| m(router))
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr = self.addr.clone();
        log::info!("🚀 Starting web server at {}", addr);

        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        // 优雅关闭处理
        let server = axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown());
        if let Err(e) = server.await {
            log::error!("Server error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        log::info!("🛑 Server stopped");
        Ok(())
    }
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            log::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::CURRENT_LANG;
    use axum::{body::Body, routing::get};
    use http::Request;
    use tower::util::ServiceExt;

    async fn check_lang() -> String {
        CURRENT_LANG
            .try_with(|l| l.code().to_string())
            .unwrap_or_else(|_| "not set".to_string())
    }

    async fn body_of(app: Router, lang: Option<&str>) -> String {
        let mut req = Request::builder().uri("/");
        if let Some(lang) = lang {
            req = req.header("accept-language", lang);
        }
        let response = ServiceExt::oneshot(app, req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_layer_after_mount() {
        let app = WebServer::new("0.0.0.0:0")
            .mount(Router::new().route("/", get(check_lang)))
            .layer_i18n()
            .into_router();

        assert_eq!(body_of(app, None).await, "en");
    }

    #[tokio::test]
    async fn test_layer_before_mount() {
        let app = WebServer::new("0.0.0.0:0")
            .layer_i18n()
            .mount(Router::new().route("/", get(check_lang)))
            .into_router();

        assert_eq!(body_of(app, Some("bn-BD,bn;q=0.9")).await, "bn");
    }

    #[tokio::test]
    async fn without_the_layer_nothing_is_scoped() {
        let app = WebServer::new("0.0.0.0:0")
            .mount(Router::new().route("/", get(check_lang)))
            .into_router();

        assert_eq!(body_of(app, Some("zh")).await, "not set");
    }
}
