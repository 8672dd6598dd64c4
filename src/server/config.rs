use std::net::SocketAddr;
use std::time::Duration;

use crate::h1::Limits;
use crate::headers::HeaderValue;
use crate::response::writer::WriteOptions;

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address to bind, default `127.0.0.1:8080`.
    pub addr: SocketAddr,
    /// Request decoding limits.
    pub limits: Limits,
    /// Maximum time a connection may wait for request bytes, default 30 seconds.
    pub idle_timeout: Duration,
    /// `Server` header value, added to responses which do not set one.
    pub server_name: Option<String>,
    /// Add `Date` header to responses which do not set one, default `true`.
    pub date_header: bool,
}

/// Invalid [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("limit `{0}` must be non zero")]
    ZeroLimit(&'static str),
    #[error("path limit exceeds request line limit")]
    PathExceedsRequestLine,
    #[error("idle timeout must be non zero")]
    ZeroTimeout,
    #[error("server name is not a valid header value")]
    InvalidServerName,
}

impl Config {
    /// Create default [`Config`] bound to `addr`.
    pub fn bind(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Self::default()
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Limits {
            max_request_line,
            max_path,
            max_header_bytes,
            max_headers,
            max_body: _,
        } = self.limits;

        let limits = [
            ("max_request_line", max_request_line),
            ("max_path", max_path),
            ("max_header_bytes", max_header_bytes),
            ("max_headers", max_headers),
        ];
        if let Some(&(name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroLimit(name));
        }
        if max_path > max_request_line {
            return Err(ConfigError::PathExceedsRequestLine);
        }
        if self.idle_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if let Some(name) = &self.server_name {
            HeaderValue::try_from(name.as_str()).map_err(|_| ConfigError::InvalidServerName)?;
        }
        Ok(())
    }

    /// Base write options for responses of this server.
    pub(crate) fn write_options(&self) -> WriteOptions {
        WriteOptions {
            date: self.date_header,
            server: self
                .server_name
                .as_deref()
                .and_then(|name| HeaderValue::try_from(name).ok()),
            ..WriteOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            limits: Limits::default(),
            idle_timeout: Duration::from_secs(30),
            server_name: None,
            date_header: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert_eq!(Config::default().validate(), Ok(()));

        let mut config = Config::bind(([0, 0, 0, 0], 3000));
        assert_eq!(config.addr.port(), 3000);

        config.limits.max_headers = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroLimit("max_headers")));

        config.limits = Limits {
            max_path: 9000,
            max_request_line: 8000,
            ..Limits::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PathExceedsRequestLine));

        config.limits = Limits::default();
        config.idle_timeout = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        config.idle_timeout = Duration::from_secs(1);
        config.server_name = Some("bad\nname".into());
        assert_eq!(config.validate(), Err(ConfigError::InvalidServerName));

        config.server_name = Some("tsuna".into());
        assert_eq!(config.validate(), Ok(()));
        assert!(config.write_options().server.is_some());
    }
}
