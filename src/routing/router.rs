use std::sync::Arc;

use super::controller::Controller;
use super::handler::Handler;
use super::node::{Binding, Node};
use super::params::Params;
use super::pattern;
use crate::auth::{AuthKind, Authorizer};
use crate::headers::{HeaderValue, standard};
use crate::http::{Method, MethodSet, StatusCode};
use crate::log::{debug, trace};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::routing::RouteError;

/// Route trie mapping method and path to a [`Handler`].
///
/// Routes are registered before serving, the router is read only afterwards.
#[derive(Default)]
pub struct Router {
    root: Node,
}

/// Matched route.
pub struct Match<'r> {
    binding: &'r Binding,
    params: Params,
}

/// Result of [`Router::resolve`].
pub enum Resolution<'r> {
    Match(Match<'r>),
    NotFound,
    /// Path matches but method is not bound, carries the allowed methods.
    MethodNotAllowed(MethodSet),
}

impl Router {
    /// Create new empty [`Router`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern` without authentication.
    pub fn route<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.route_with(method, pattern, Authorizer::none(), handler)
    }

    /// Register `handler` for `method` and `pattern`, guarded by `auth`.
    pub fn route_with<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        auth: Authorizer,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.insert(method, pattern, auth, Arc::new(handler))?;
        Ok(self)
    }

    pub(crate) fn insert(
        &mut self,
        method: Method,
        pattern: &str,
        auth: Authorizer,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouteError> {
        insert_into(&mut self.root, method, pattern, auth, handler)
    }

    /// Register several routes at once, either all of them are bound or none is.
    pub(crate) fn insert_all<I>(&mut self, routes: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = (Method, String, Authorizer, Arc<dyn Handler>)>,
    {
        let mut root = self.root.clone();
        for (method, pattern, auth, handler) in routes {
            insert_into(&mut root, method, &pattern, auth, handler)?;
        }
        self.root = root;
        Ok(())
    }

    /// Register `handler` for every method.
    pub fn any<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.methods(MethodSet::ALL, pattern, handler)
    }

    /// Register `handler` for every method in `methods`.
    pub fn methods<H: Handler>(
        &mut self,
        methods: MethodSet,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        let handler: Arc<dyn Handler> = Arc::new(handler);
        self.insert_all(methods.iter().map(|method| {
            (method, pattern.to_owned(), Authorizer::none(), handler.clone())
        }))?;
        Ok(self)
    }

    /// Mount all routes of a [`Controller`], or anything convertible into one such as
    /// [`StaticFiles`][crate::routing::StaticFiles].
    pub fn mount(&mut self, controller: impl Into<Controller>) -> Result<&mut Self, RouteError> {
        controller.into().register(self)?;
        Ok(self)
    }

    /// Returns the number of registered method and pattern pairs.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_into(
    root: &mut Node,
    method: Method,
    pattern: &str,
    auth: Authorizer,
    handler: Arc<dyn Handler>,
) -> Result<(), RouteError> {
    let segments = pattern::parse(pattern)?;
    debug!("route {method} {pattern} ({:?})", auth.kind());
    let binding = Binding {
        handler,
        auth,
        pattern: Arc::from(pattern),
    };
    root.insert(&segments, method, binding)
}

macro_rules! methods {
    ($($name:ident => $method:ident),* $(,)?) => {
        /// Method shortcuts
        impl Router {
            $(
                #[doc = concat!("Register `", stringify!($method), "` handler without authentication.")]
                pub fn $name<H: Handler>(
                    &mut self,
                    pattern: &str,
                    handler: H,
                ) -> Result<&mut Self, RouteError> {
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

/// Dispatch
impl Router {
    /// Resolve `method` and normalized `path`.
    pub fn resolve(&self, method: Method, path: &str) -> Resolution<'_> {
        let segments = pattern::split_path(path);
        let mut params = Params::new();

        let bound = |node: &Node| node.binding_for(method).is_some();
        if let Some(node) = self.root.find(&segments, &bound, &mut params) {
            if let Some(binding) = node.binding_for(method) {
                return Resolution::Match(Match { binding, params });
            }
        }

        params = Params::new();
        match self.root.find(&segments, &Node::has_binding, &mut params) {
            Some(node) => Resolution::MethodNotAllowed(node.allowed()),
            None => Resolution::NotFound,
        }
    }

    /// Resolve request, authorize it, then call the handler.
    ///
    /// Routing and authentication failures are answered without invoking any handler.
    pub async fn dispatch(&self, req: Request) -> Response {
        let matched = match self.resolve(req.method(), req.path()) {
            Resolution::Match(matched) => matched,
            Resolution::NotFound => {
                trace!("no route for {} {}", req.method(), req.path());
                return (StatusCode::NOT_FOUND, "Not Found").into_response();
            }
            Resolution::MethodNotAllowed(allowed) => {
                trace!("{} not allowed for {}", req.method(), req.path());
                let mut res = (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
                if let Ok(allow) = HeaderValue::try_from(allowed.to_string()) {
                    res.headers_mut().insert(standard::ALLOW, allow);
                }
                return res;
            }
        };

        let auth = match matched.binding.auth.authorize(&req) {
            Ok(auth) => auth,
            Err(rejection) => return matched.binding.auth.reject(rejection),
        };

        let handler = matched.binding.handler.clone();
        handler.call(req, matched.params, auth).await
    }
}

impl Match<'_> {
    /// Returns the matched pattern.
    pub fn pattern(&self) -> &str {
        &self.binding.pattern
    }

    /// Returns captured parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the auth kind required by the route.
    pub fn auth(&self) -> AuthKind {
        self.binding.auth.kind()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("routes", &self.len()).finish()
    }
}

impl std::fmt::Debug for Match<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Match")
            .field("pattern", &self.pattern())
            .field("params", &self.params)
            .field("auth", &self.auth())
            .finish()
    }
}

impl std::fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match(m) => f.debug_tuple("Match").field(m).finish(),
            Self::NotFound => f.write_str("NotFound"),
            Self::MethodNotAllowed(set) => f.debug_tuple("MethodNotAllowed").field(set).finish(),
        }
    }
}
