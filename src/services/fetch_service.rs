//! 答题卡获取服务
//!
//! 依次尝试直连、代理和浏览器路线，第一条成功的路线胜出；
//! 分页答题卡按页码顺序获取并用分隔标记拼接

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::browser::BrowserRoute;
use crate::clients::{DirectRoute, ProxyRoute, SheetClient, SheetSource};
use crate::config::Config;
use crate::error::FetchError;
use crate::infrastructure::PART_SEPARATOR;

/// 分页正文不超过该长度视为没有更多分页
pub const MIN_PART_LEN: usize = 200;

/// 最大分页号
pub const MAX_PART: u32 = 5;

static FIRST_PART_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ViewCandResponse\.aspx").unwrap());

/// 获取结果，供界面层直接序列化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<String, FetchError>> for FetchOutcome {
    fn from(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(html) => Self {
                success: true,
                html: Some(html),
                error: None,
            },
            Err(e) => Self {
                success: false,
                html: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// 只接受 digialm 门户或 .html 答题卡地址
pub fn validate_url(url: &str) -> Result<(), FetchError> {
    if url.contains("digialm.com") || url.contains(".html") {
        Ok(())
    } else {
        Err(FetchError::UnsupportedUrl {
            url: url.to_string(),
        })
    }
}

pub fn is_multi_part(url: &str) -> bool {
    url.to_lowercase().contains("viewcandresponse")
}

/// 所有分页地址，第一页为原地址
pub fn part_urls(url: &str) -> Vec<String> {
    let mut urls = vec![url.to_string()];
    for part in 2..=MAX_PART {
        let part_url = FIRST_PART_PAGE
            .replace(url, format!("ViewCandResponse{}.aspx", part).as_str())
            .into_owned();
        if part_url != url {
            urls.push(part_url);
        }
    }
    urls
}

/// 答题卡获取服务
pub struct FetchService {
    routes: Vec<Box<dyn SheetSource>>,
}

impl FetchService {
    pub fn new(routes: Vec<Box<dyn SheetSource>>) -> Self {
        Self { routes }
    }

    /// 按配置组装路线：直连 → 代理 → 浏览器（配置了调试端口时）
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = SheetClient::new(Duration::from_secs(config.fetch_timeout_secs))?;

        let mut routes: Vec<Box<dyn SheetSource>> = vec![Box::new(DirectRoute::new(client.clone()))];
        for proxy in ProxyRoute::defaults(&client) {
            routes.push(Box::new(proxy));
        }
        if let Some(port) = config.browser_debug_port {
            routes.push(Box::new(BrowserRoute::new(port)));
        }

        debug!(
            "获取路线: {}",
            routes.iter().map(|r| r.name()).collect::<Vec<_>>().join(" → ")
        );
        Ok(Self::new(routes))
    }

    /// 依次尝试每条路线，第一条成功的路线胜出
    pub async fn fetch_with_fallback(&self, url: &str) -> Result<String, FetchError> {
        for route in &self.routes {
            match route.fetch_text(url).await {
                Ok(html) => {
                    info!("✓ [{}] 获取成功: {} 字节", route.name(), html.len());
                    return Ok(html);
                }
                Err(e) => debug!("[{}] 获取失败: {}", route.name(), e),
            }
        }

        warn!("所有获取路线均失败: {}", url);
        Err(FetchError::AllRoutesFailed {
            url: url.to_string(),
        })
    }

    /// 获取分页答题卡
    ///
    /// 分页按顺序获取，遇到第一个失败或过短的分页即停止，不重试
    pub async fn fetch_multi_part(&self, url: &str) -> Result<String, FetchError> {
        let mut parts = Vec::new();

        for (idx, part_url) in part_urls(url).iter().enumerate() {
            match self.fetch_with_fallback(part_url).await {
                Ok(html) if html.len() > MIN_PART_LEN => parts.push(html),
                Ok(html) => {
                    debug!("第 {} 页过短 ({} 字节)，没有更多分页", idx + 1, html.len());
                    break;
                }
                Err(_) => {
                    debug!("第 {} 页获取失败，没有更多分页", idx + 1);
                    break;
                }
            }
        }

        if parts.is_empty() {
            return Err(FetchError::NoParts {
                url: url.to_string(),
            });
        }

        info!("📄 共获取 {} 个分页", parts.len());
        Ok(parts.join(&format!("\n{}\n", PART_SEPARATOR)))
    }

    /// 校验地址后获取答题卡（分页地址自动拼接）
    pub async fn fetch_sheet(&self, url: &str) -> Result<String, FetchError> {
        validate_url(url)?;
        info!("正在获取答题卡: {}", url);

        if is_multi_part(url) {
            self.fetch_multi_part(url).await
        } else {
            self.fetch_with_fallback(url).await
        }
    }

    /// 与 `fetch_sheet` 相同，但把错误折叠进 `FetchOutcome`
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        self.fetch_sheet(url).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// 按地址返回预设正文的假路线
    struct FakeRoute {
        name: &'static str,
        pages: HashMap<String, String>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeRoute {
        fn new(name: &'static str, pages: &[(&str, String)]) -> Self {
            Self {
                name,
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.clone()))
                    .collect(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl SheetSource for FakeRoute {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::RouteFailed {
                    route: self.name.to_string(),
                    reason: "404".to_string(),
                })
        }
    }

    fn page(marker: &str) -> String {
        format!("<html><body>{}{}</body></html>", marker, " ".repeat(300))
    }

    const SHEET: &str = "https://ssc.digialm.com/per/g27/pub/2207/touchstone/ViewCandResponse.aspx";

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://ssc.digialm.com/x").is_ok());
        assert!(validate_url("https://mirror.example.org/sheet.html").is_ok());
        assert!(matches!(
            validate_url("https://example.org/sheet.pdf"),
            Err(FetchError::UnsupportedUrl { .. })
        ));
    }

    #[test]
    fn test_part_urls() {
        let urls = part_urls(SHEET);
        assert_eq!(urls.len(), 5);
        assert!(urls[1].ends_with("ViewCandResponse2.aspx"));
        assert!(urls[4].ends_with("ViewCandResponse5.aspx"));

        assert_eq!(part_urls("https://x/y.html"), vec!["https://x/y.html".to_string()]);
    }

    #[tokio::test]
    async fn test_first_successful_route_wins() {
        let direct = FakeRoute::new("direct", &[]);
        let proxy = FakeRoute::new("proxy", &[("https://x/a.html", page("A"))]);
        let backup = FakeRoute::new("backup", &[("https://x/a.html", page("B"))]);
        let backup_calls = backup.calls.clone();

        let service = FetchService::new(vec![Box::new(direct), Box::new(proxy), Box::new(backup)]);
        let html = service.fetch_sheet("https://x/a.html").await.unwrap();

        assert!(html.contains('A'));
        assert_eq!(backup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_routes_failing_is_an_error() {
        let service = FetchService::new(vec![Box::new(FakeRoute::new("direct", &[]))]);
        let outcome = service.fetch("https://x/a.html").await;

        assert!(!outcome.success);
        assert!(outcome.html.is_none());
        assert!(outcome.error.unwrap().contains("https://x/a.html"));
    }

    #[tokio::test]
    async fn test_multi_part_stops_at_first_missing_part() {
        let part2 = SHEET.replace("ViewCandResponse.aspx", "ViewCandResponse2.aspx");
        let part4 = SHEET.replace("ViewCandResponse.aspx", "ViewCandResponse4.aspx");
        let route = FakeRoute::new(
            "direct",
            &[
                (SHEET, page("one")),
                (part2.as_str(), page("two")),
                (part4.as_str(), page("four")),
            ],
        );

        let html = FetchService::new(vec![Box::new(route)])
            .fetch_sheet(SHEET)
            .await
            .unwrap();

        assert_eq!(html.matches(PART_SEPARATOR).count(), 1);
        assert!(html.contains("two"));
        assert!(!html.contains("four"));
    }

    #[test]
    fn test_short_first_part_means_no_parts() {
        let route = FakeRoute::new("direct", &[(SHEET, "<html>tiny</html>".to_string())]);
        let service = FetchService::new(vec![Box::new(route)]);

        let result = tokio_test::block_on(service.fetch_multi_part(SHEET));
        assert!(matches!(result, Err(FetchError::NoParts { .. })));
    }

    #[tokio::test]
    #[ignore] // 需要网络
    async fn test_fetch_real_sheet() {
        let service = FetchService::from_config(&Config::default()).unwrap();
        let outcome = service.fetch("https://www.example.com/index.html").await;
        assert!(outcome.success);
    }
}
