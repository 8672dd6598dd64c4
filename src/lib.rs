//! Embeddable HTTP/1.1 Server
//!
//! `tsuna` turns raw byte streams into [`Request`]s, resolves them through a segment trie
//! [`Router`], enforces the authentication strategy bound to the route, and writes the handler's
//! [`Response`] back onto the wire.
//!
//! ```no_run
//! use tsuna::{Config, Server, Request, Params, AuthContext, Response};
//!
//! async fn hello(_: Request, params: Params, _: AuthContext) -> Response {
//!     Response::text(format!("hello {}", params.get("name").unwrap_or("world")))
//! }
//!
//! # async fn app() -> Result<(), tsuna::server::ServerError> {
//! let mut server = Server::new(Config::default())?;
//! server.router_mut()?.get("/hello/{name}", hello)?;
//! server.start().await?;
//! # Ok(())
//! # }
//! ```
#![warn(missing_debug_implementations)]

mod log;

pub mod bytestr;
pub mod http;
pub mod headers;
pub mod uri;
pub mod h1;
pub mod body;
pub mod request;
pub mod response;
pub mod auth;
pub mod routing;
pub mod server;

pub use bytestr::ByteStr;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use routing::{Params, Router};
pub use auth::AuthContext;
pub use server::{Config, Server};
