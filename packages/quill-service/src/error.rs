use quill_domain::{FilterRejection, QueryRejection};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Backend error: {message}")]
	Backend { message: String },
}
impl From<QueryRejection> for Error {
	fn from(rejection: QueryRejection) -> Self {
		Self::InvalidQuery { message: rejection.to_string() }
	}
}

impl From<FilterRejection> for Error {
	fn from(rejection: FilterRejection) -> Self {
		Self::InvalidRequest { message: rejection.to_string() }
	}
}

impl From<quill_storage::Error> for Error {
	fn from(err: quill_storage::Error) -> Self {
		match err {
			quill_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			quill_storage::Error::NotFound(message) => Self::NotFound { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<quill_providers::Error> for Error {
	fn from(err: quill_providers::Error) -> Self {
		Self::Backend { message: err.to_string() }
	}
}
