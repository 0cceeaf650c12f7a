use quill_domain::{SearchRequest, SearchResponse};
use quill_providers::SearchClient;

use crate::{BoxFuture, Result};

/// The ranking backend as the engine sees it: a query RPC and a suggestion RPC.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>>;

	fn suggestions<'a>(&'a self, partial_text: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// [`SearchBackend`] over HTTP, configured by `[backend]`.
pub struct HttpBackend {
	client: SearchClient,
}
impl HttpBackend {
	pub fn new(cfg: &quill_config::Backend) -> Result<Self> {
		Ok(Self { client: SearchClient::new(cfg)? })
	}
}
impl SearchBackend for HttpBackend {
	fn search<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>> {
		Box::pin(async move { Ok(self.client.search(request).await?) })
	}

	fn suggestions<'a>(&'a self, partial_text: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move { Ok(self.client.suggestions(partial_text).await?) })
	}
}
