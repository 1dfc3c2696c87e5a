use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid session secret: {0}")]
    InvalidSecret(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
