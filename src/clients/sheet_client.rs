//! 答题卡 HTTP 客户端
//!
//! 每条获取路线实现 `SheetSource`，由 `FetchService` 按顺序尝试

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::form_urlencoded;

use crate::error::FetchError;

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// 响应正文不超过该长度视为失败
pub const MIN_BODY_LEN: usize = 100;

/// 一条获取路线
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// 路线名称，用于日志和错误信息
    fn name(&self) -> &str;

    /// 获取页面正文
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// 共享的 reqwest 客户端
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
}

impl SheetClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));

        let client = Client::builder()
            .user_agent(DESKTOP_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::RouteFailed {
                route: "client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// GET 请求，非 2xx 或正文过短都视为失败
    pub async fn get_text(&self, route: &str, request_url: &str) -> Result<String, FetchError> {
        debug!("[{}] GET {}", route, request_url);

        let response = self.client.get(request_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RouteFailed {
                route: route.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        check_body(route, body)
    }
}

pub(crate) fn check_body(route: &str, body: String) -> Result<String, FetchError> {
    if body.len() <= MIN_BODY_LEN {
        return Err(FetchError::BodyTooShort {
            route: route.to_string(),
            length: body.len(),
        });
    }
    Ok(body)
}

/// 直接访问原地址
pub struct DirectRoute {
    client: SheetClient,
}

impl DirectRoute {
    pub fn new(client: SheetClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SheetSource for DirectRoute {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.client.get_text(self.name(), url).await
    }
}

/// 通过公共代理访问
pub struct ProxyRoute {
    client: SheetClient,
    name: &'static str,
    prefix: &'static str,
    encode_target: bool,
}

/// 代理列表：(名称, 前缀, 是否对目标地址编码)
pub const PROXIES: &[(&str, &str, bool)] = &[
    ("allorigins", "https://api.allorigins.win/raw?url=", true),
    ("corsproxy", "https://corsproxy.io/?", true),
    ("thingproxy", "https://thingproxy.freeboard.io/fetch/", false),
];

impl ProxyRoute {
    pub fn new(client: SheetClient, name: &'static str, prefix: &'static str, encode_target: bool) -> Self {
        Self {
            client,
            name,
            prefix,
            encode_target,
        }
    }

    /// 默认代理路线，按固定顺序
    pub fn defaults(client: &SheetClient) -> Vec<Self> {
        PROXIES
            .iter()
            .map(|&(name, prefix, encode)| Self::new(client.clone(), name, prefix, encode))
            .collect()
    }

    pub fn request_url(&self, target: &str) -> String {
        if self.encode_target {
            let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
            format!("{}{}", self.prefix, encoded)
        } else {
            format!("{}{}", self.prefix, target)
        }
    }
}

#[async_trait]
impl SheetSource for ProxyRoute {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.client.get_text(self.name, &self.request_url(url)).await
    }
}
