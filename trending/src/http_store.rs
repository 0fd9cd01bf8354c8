use crate::CounterStore;
use crate::config::TrendingConfig;
use crate::error::Result;
use crate::error::TrendingError;
use async_trait::async_trait;
use moviescope_protocol::NewTrendingRecord;
use moviescope_protocol::TrendingEntry;
use moviescope_protocol::TrendingRecordList;
use moviescope_protocol::TrendingUpdate;
use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use url::Url;

/// Counter store reached over a small REST surface:
/// `GET /records?query=`, `POST /records`, `PATCH /records/{id}` and
/// `GET /records?order=count.desc&limit=`.
#[derive(Clone)]
pub struct HttpCounterStore {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCounterStore {
    pub fn new(config: &TrendingConfig) -> Result<Self> {
        config.validate().map_err(TrendingError::Config)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn records_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("{}/records", self.base_url))?)
    }

    fn record_url(&self, record_id: &str) -> Result<Url> {
        let mut url = self.records_url()?;
        url.path_segments_mut()
            .map_err(|()| {
                TrendingError::Config(format!("cannot-be-a-base URL: {}", self.base_url))
            })?
            .push(record_id);
        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(key) = self.api_key.as_deref() {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn send<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> Result<T> {
        let resp = request.headers(self.headers()?).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrendingError::NotFound(format!("{what}: {body}")));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrendingError::Transport(format!(
                "{what} request failed: {status} - {body}"
            )));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl CounterStore for HttpCounterStore {
    async fn find_by_query(&self, normalized_query: &str) -> Result<Vec<TrendingEntry>> {
        let mut url = self.records_url()?;
        url.query_pairs_mut().append_pair("query", normalized_query);
        let list: TrendingRecordList = self.send("list", self.http.get(url)).await?;
        Ok(list.documents)
    }

    async fn create(&self, record: NewTrendingRecord) -> Result<TrendingEntry> {
        let url = self.records_url()?;
        self.send("create", self.http.post(url).json(&record)).await
    }

    async fn update(&self, record_id: &str, update: TrendingUpdate) -> Result<TrendingEntry> {
        let url = self.record_url(record_id)?;
        self.send("update", self.http.patch(url).json(&update)).await
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        let mut url = self.records_url()?;
        url.query_pairs_mut()
            .append_pair("order", "count.desc")
            .append_pair("limit", &limit.to_string());
        let list: TrendingRecordList = self.send("top", self.http.get(url)).await?;
        Ok(list.documents)
    }
}
