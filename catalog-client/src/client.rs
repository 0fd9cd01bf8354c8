use crate::Catalog;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::error::Result;
use async_trait::async_trait;
use moviescope_protocol::CatalogPage;
use moviescope_protocol::Credits;
use moviescope_protocol::MovieDetails;
use moviescope_protocol::MovieSummary;
use moviescope_protocol::MovieWithCast;
use moviescope_protocol::Query;
use moviescope_protocol::SearchResult;
use moviescope_protocol::UpstreamStatus;
use moviescope_protocol::details::TOP_CAST_LIMIT;
use moviescope_protocol::poster_url;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::warn;
use url::Url;

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
    max_total_pages: u32,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        config.validate().map_err(CatalogError::Config)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            api_key: config.api_key.clone(),
            max_total_pages: config.max_total_pages,
        })
    }

    /// Discover URL for an empty query, search URL otherwise.
    pub fn listing_url(&self, query: &Query, page: u32) -> Result<Url> {
        let page = page.max(1).to_string();
        let url = if query.is_empty() {
            let mut url = Url::parse(&format!("{}/discover/movie", self.base_url))?;
            url.query_pairs_mut()
                .append_pair("sort_by", "popularity.desc")
                .append_pair("page", &page);
            url
        } else {
            let mut url = Url::parse(&format!("{}/search/movie", self.base_url))?;
            url.query_pairs_mut()
                .append_pair("query", query.as_str())
                .append_pair("page", &page);
            url
        };
        Ok(url)
    }

    pub async fn fetch_page(&self, query: &Query, page: u32) -> Result<SearchResult> {
        let url = self.listing_url(query, page)?;
        debug!("fetching catalog page {page} for query {:?}", query.as_str());
        let body: CatalogPage = self.get_json(url).await?;
        if body.status.is_failure() {
            let message = body.status.failure_message().map(str::to_string);
            warn!("catalog reported a failure for {:?}: {message:?}", query.as_str());
            return Err(CatalogError::Upstream(message));
        }
        Ok(body.into_result(self.max_total_pages))
    }

    pub async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let url = Url::parse(&format!("{}/movie/{movie_id}", self.base_url))?;
        self.get_checked(url).await
    }

    pub async fn movie_credits(&self, movie_id: u64) -> Result<Credits> {
        let url = Url::parse(&format!("{}/movie/{movie_id}/credits", self.base_url))?;
        self.get_checked(url).await
    }

    /// Details plus the top-billed cast. Both requests must succeed.
    pub async fn movie_with_cast(&self, movie_id: u64) -> Result<MovieWithCast> {
        let movie = self.movie_details(movie_id).await?;
        let credits = self.movie_credits(movie_id).await?;
        Ok(MovieWithCast {
            movie,
            cast: credits.top_cast(TOP_CAST_LIMIT),
        })
    }

    pub fn poster_url(&self, movie: &MovieSummary) -> Option<String> {
        poster_url(&self.image_base_url, movie.poster_path.as_deref())
    }

    /// Decodes a body that may carry failure markers alongside the payload.
    async fn get_checked<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let value: serde_json::Value = self.get_json(url).await?;
        let status: UpstreamStatus = serde_json::from_value(value.clone())
            .map_err(|err| CatalogError::Transport(format!("invalid catalog body: {err}")))?;
        if status.is_failure() {
            return Err(CatalogError::Upstream(
                status.failure_message().map(str::to_string),
            ));
        }
        serde_json::from_value(value)
            .map_err(|err| CatalogError::Transport(format!("invalid catalog body: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Transport(format!(
                "catalog request failed: {status} - {body}"
            )));
        }
        Ok(resp.json().await?)
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch(&self, query: &Query, page: u32) -> Result<SearchResult> {
        self.fetch_page(query, page).await
    }
}
