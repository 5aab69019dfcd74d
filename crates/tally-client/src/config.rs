use crate::error::ClientError;

/// Where the client sends files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: String,
}

impl ClientConfig {
    /// Parse `<program> <host> <port>`. Extra arguments are ignored.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ClientError> {
        let mut args = args.into_iter().skip(1);
        match (args.next(), args.next()) {
            (Some(host), Some(port)) => Ok(Self { host, port }),
            _ => Err(ClientError::MissingArguments),
        }
    }

    /// `host:port`, with IPv6 literals in brackets.
    pub fn target_address(&self) -> String {
        format!("{}:{}", bracket_host(&self.host), self.port)
    }
}

/// Wrap a host containing ':' in brackets, unless it already is.
pub fn bracket_host(host: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    }
}
