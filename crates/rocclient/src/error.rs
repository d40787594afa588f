use rocproto::error_codes::DeviceErrors;
use rocproto::ProtoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    ConnectFailed {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("timed out connecting to {0}")]
    ConnectTimeout(std::net::SocketAddr),

    #[error("timed out reading response")]
    ReadTimeout,

    #[error("timed out writing request")]
    WriteTimeout,

    #[error("connection closed by peer")]
    ClosedByPeer,

    #[error("a request is already in flight")]
    Busy,

    #[error("device returned an empty response for opcode {0}")]
    EmptyResponse(u8),

    #[error("device reported errors: {0}")]
    Device(DeviceErrors),

    #[error("response opcode {got} does not answer request opcode {expected}")]
    UnexpectedResponse { got: u8, expected: u8 },

    #[error("invalid client configuration: {0}")]
    ConfigInvalid(String),

    #[error("unexpected data in response: {0}")]
    Data(String),

    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error(transparent)]
    Registry(#[from] roctlp::TlpError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Losing framing loses the read boundary; the connection must be
    /// torn down before the next request.
    pub fn closes_connection(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectFailed { .. }
                | ClientError::ConnectTimeout(_)
                | ClientError::ReadTimeout
                | ClientError::WriteTimeout
                | ClientError::ClosedByPeer
                | ClientError::Io(_)
                | ClientError::Proto(
                    ProtoError::FrameTooShort { .. }
                        | ProtoError::CrcMismatch { .. }
                        | ProtoError::UnknownOpcode(_)
                )
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
