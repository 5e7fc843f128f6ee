use gcp_auth::Error as AuthError;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Credential material is missing, malformed or was rejected.
    Authentication(String),
    /// The backend could not be reached or the session failed.
    Connection(String),
    /// A referenced collection or document does not exist.
    NotFound(String),
    /// The operation descriptor or one of its arguments is malformed.
    InvalidOperation(String),
    /// The client has no open session.
    NotConnected,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "authentication failed: {}", msg),
            Error::Connection(msg) => write!(f, "connection error: {}", msg),
            Error::NotFound(msg) => write!(f, "not found: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "invalid operation: {}", msg),
            Error::NotConnected => write!(f, "client is not connected"),
        }
    }
}

impl std::error::Error for Error {}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Authentication(err.to_string())
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<tonic::metadata::errors::InvalidMetadataValue> for Error {
    fn from(err: tonic::metadata::errors::InvalidMetadataValue) -> Self {
        Error::Authentication(format!("unusable access token: {}", err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<crate::serde_document::Error> for Error {
    fn from(err: crate::serde_document::Error) -> Self {
        Error::InvalidOperation(err.to_string())
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::Unauthenticated | Code::PermissionDenied => Error::Authentication(message),
            Code::NotFound => Error::NotFound(message),
            Code::InvalidArgument
            | Code::FailedPrecondition
            | Code::AlreadyExists
            | Code::OutOfRange => Error::InvalidOperation(message),
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled | Code::Aborted => {
                Error::Connection(message)
            }
            code => Error::Connection(format!("{:?}: {}", code, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use tonic::{Code, Status};

    #[test]
    fn status_codes_map_onto_taxonomy() {
        let cases = vec![
            (Code::Unauthenticated, Error::Authentication("m".into())),
            (Code::PermissionDenied, Error::Authentication("m".into())),
            (Code::NotFound, Error::NotFound("m".into())),
            (Code::AlreadyExists, Error::InvalidOperation("m".into())),
            (Code::InvalidArgument, Error::InvalidOperation("m".into())),
            (Code::Unavailable, Error::Connection("m".into())),
            (Code::DeadlineExceeded, Error::Connection("m".into())),
        ];
        for (code, expected) in cases {
            assert_eq!(Error::from(Status::new(code, "m")), expected);
        }
    }

    #[test]
    fn unmapped_status_keeps_code_in_message() {
        let err = Error::from(Status::new(Code::Internal, "boom"));
        assert_eq!(err, Error::Connection("Internal: boom".into()));
    }

    #[test]
    fn display() {
        assert_eq!(Error::NotConnected.to_string(), "client is not connected");
        assert_eq!(
            Error::NotFound("collection users".into()).to_string(),
            "not found: collection users"
        );
    }
}
