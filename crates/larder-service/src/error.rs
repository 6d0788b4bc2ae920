pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {message}")]
	InvalidArgument { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<larder_storage::Error> for Error {
	fn from(err: larder_storage::Error) -> Self {
		match err {
			larder_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			larder_storage::Error::InvalidArgument(message) => Self::InvalidArgument { message },
			larder_storage::Error::NotFound(message) => Self::NotFound { message },
			larder_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}
