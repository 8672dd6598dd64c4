use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use super::controller::Controller;
use super::handler::Handler;
use crate::auth::{AuthContext, Authorizer};
use crate::http::{Method, StatusCode, mime};
use crate::log::error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::routing::Params;

/// File lookup backing [`StaticFiles`].
pub trait Repository: Send + Sync + 'static {
    /// Read file at `path`, relative to the repository root.
    fn read(&self, path: &str) -> Result<Bytes, RepositoryError>;
}

/// [`Repository`] error.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("file not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// [`Repository`] reading from a directory.
///
/// Paths escaping the root directory are never read.
#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    /// Create new [`FsRepository`] rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `path` into the root, `None` if it would escape.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

impl Repository for FsRepository {
    fn read(&self, path: &str) -> Result<Bytes, RepositoryError> {
        let path = self.resolve(path).ok_or(RepositoryError::NotFound)?;
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(RepositoryError::NotFound),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound);
            }
            Err(err) => return Err(err.into()),
        }
        Ok(std::fs::read(&path)?.into())
    }
}

/// Serve files from a [`Repository`] under a base route.
///
/// Registers `GET` and `HEAD` for `{base}/*`, the captured remainder is the file path, and the
/// content type is chosen by its extension.
pub struct StaticFiles {
    base: String,
    repository: Arc<dyn Repository>,
    auth: Authorizer,
}

impl StaticFiles {
    /// Create new [`StaticFiles`] serving `repository` under `base`.
    pub fn new<R: Repository>(base: impl Into<String>, repository: R) -> Self {
        Self {
            base: base.into(),
            repository: Arc::new(repository),
            auth: Authorizer::none(),
        }
    }

    /// Guard files with `auth`.
    pub fn with_authorizer(mut self, auth: Authorizer) -> Self {
        self.auth = auth;
        self
    }

    fn handler(&self) -> Arc<dyn Handler> {
        let repository = self.repository.clone();
        Arc::new(move |_: Request, params: Params, _: AuthContext| {
            serve(repository.clone(), params)
        })
    }
}

async fn serve(repository: Arc<dyn Repository>, params: Params) -> Response {
    let path = params.wildcard().unwrap_or_default().to_owned();
    if path.is_empty() {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    let content_type = mime::from_path(&path);
    let read = tokio::task::spawn_blocking(move || repository.read(&path)).await;

    match read {
        Ok(Ok(bytes)) => Response::typed(content_type, bytes),
        Ok(Err(RepositoryError::NotFound)) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Ok(Err(RepositoryError::Io(err))) => {
            error!("failed to read static file: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            error!("static file task failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl From<StaticFiles> for Controller {
    fn from(files: StaticFiles) -> Self {
        let handler = files.handler();
        Controller::new(files.base)
            .with_authorizer(files.auth)
            .route_shared(Method::GET, "/*", handler.clone())
            .route_shared(Method::HEAD, "/*", handler)
    }
}

impl std::fmt::Debug for StaticFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticFiles")
            .field("base", &self.base)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
