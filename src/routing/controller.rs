use std::sync::Arc;

use super::handler::Handler;
use super::router::Router;
use crate::auth::{AuthStrategy, Authorizer};
use crate::http::Method;
use crate::routing::RouteError;

/// A group of routes under one base path, sharing one auth strategy.
///
/// ```
/// use tsuna::{Request, Params, AuthContext, Router};
/// use tsuna::auth::Basic;
/// use tsuna::routing::Controller;
///
/// async fn me(_: Request, _: Params, auth: AuthContext) -> String {
///     auth.principal().unwrap_or_default().to_owned()
/// }
///
/// let basic = Basic::new();
/// basic.set("admin", "secret");
///
/// let mut router = Router::new();
/// router.mount(Controller::new("/admin").with_auth(basic).get("/me", me)).unwrap();
/// ```
pub struct Controller {
    base: String,
    auth: Authorizer,
    routes: Vec<(Method, String, Arc<dyn Handler>)>,
}

impl Controller {
    /// Create new [`Controller`] under `base` path, without authentication.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            auth: Authorizer::none(),
            routes: Vec::new(),
        }
    }

    /// Guard all routes with `strategy`.
    pub fn with_auth<A: AuthStrategy>(self, strategy: A) -> Self {
        self.with_authorizer(Authorizer::new(strategy))
    }

    /// Guard all routes with `auth`.
    pub fn with_authorizer(mut self, auth: Authorizer) -> Self {
        self.auth = auth;
        self
    }

    /// Add a route, `pattern` is relative to the base path.
    pub fn route<H: Handler>(mut self, method: Method, pattern: &str, handler: H) -> Self {
        self.routes
            .push((method, pattern.to_owned(), Arc::new(handler)));
        self
    }

    pub(crate) fn route_shared(
        mut self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Self {
        self.routes.push((method, pattern.to_owned(), handler));
        self
    }

    /// Returns the base path.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Bind every route into `router`, on error nothing is bound.
    pub(crate) fn register(self, router: &mut Router) -> Result<(), RouteError> {
        let Self { base, auth, routes } = self;
        let base = base.trim_end_matches('/');
        router.insert_all(routes.into_iter().map(|(method, pattern, handler)| {
            let full = format!("{base}/{}", pattern.trim_start_matches('/'));
            (method, full, auth.clone(), handler)
        }))
    }
}

macro_rules! methods {
    ($($name:ident => $method:ident),* $(,)?) => {
        /// Method shortcuts
        impl Controller {
            $(
                #[doc = concat!("Add a `", stringify!($method), "` route, `pattern` is relative to the base path.")]
                pub fn $name<H: Handler>(self, pattern: &str, handler: H) -> Self {
                    self.route(Method::$method, pattern, handler)
                }
            )*
        }
    };
}

methods! {
    get => GET,
    post => POST,
    put => PUT,
    delete => DELETE,
    patch => PATCH,
    head => HEAD,
    options => OPTIONS,
    trace => TRACE,
    connect => CONNECT,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("base", &self.base)
            .field("auth", &self.auth)
            .field("routes", &self.routes.len())
            .finish()
    }
}
