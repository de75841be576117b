use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::clients::sheet_client::{check_body, SheetSource};
use crate::error::FetchError;

/// 与已在运行的浏览器之间的连接
///
/// 后台事件任务随连接一起结束
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// 连接到已在运行的浏览器（需以 --remote-debugging-port 启动）
    pub async fn connect(port: u16) -> Result<Self> {
        let browser_url = format!("http://localhost:{}", port);
        info!("正在连接到浏览器: {}", browser_url);

        let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
            error!("连接浏览器失败: {}", e);
            e
        })?;
        debug!("浏览器连接成功");

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 等待浏览器状态同步
        sleep(tokio::time::Duration::from_millis(300)).await;

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// 事件任务结束说明连接已断开
    pub fn is_alive(&self) -> bool {
        !self.handler_task.is_finished()
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// 打开新标签页，等待加载完成后读取页面 HTML
///
/// 无论读取成功与否，打开的标签页都会被关闭
pub async fn fetch_page_html(browser: &Browser, url: &str) -> Result<String> {
    debug!("创建新页面并导航到: {}", url);
    let page = browser.new_page(url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", url, e);
        e
    })?;

    let html = read_page(&page).await;

    if let Err(e) = page.close().await {
        debug!("关闭页面失败: {}", e);
    }

    let html = html?;
    info!("已从浏览器读取页面: {} ({} 字节)", url, html.len());
    Ok(html)
}

async fn read_page(page: &Page) -> Result<String> {
    page.wait_for_navigation().await?;
    Ok(page.content().await?)
}

/// 浏览器路线：借用已登录的浏览器会话读取答题卡
///
/// 连接在第一次获取时建立，之后复用；连接断开后下一次获取时重连
pub struct BrowserRoute {
    port: u16,
    session: Mutex<Option<BrowserSession>>,
}

impl BrowserRoute {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            session: Mutex::new(None),
        }
    }

    /// 当前是否持有可用的连接
    pub async fn is_connected(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(BrowserSession::is_alive)
    }

    fn route_failed(&self, reason: impl ToString) -> FetchError {
        FetchError::RouteFailed {
            route: self.name().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl SheetSource for BrowserRoute {
    fn name(&self) -> &str {
        "browser"
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut slot = self.session.lock().await;

        let session = match slot.take() {
            Some(session) if session.is_alive() => session,
            stale => {
                if stale.is_some() {
                    warn!("浏览器连接已断开，重新连接");
                }
                BrowserSession::connect(self.port)
                    .await
                    .map_err(|e| self.route_failed(e))?
            }
        };
        let session = slot.insert(session);

        let html = fetch_page_html(session.browser(), url)
            .await
            .map_err(|e| self.route_failed(e))?;

        check_body(self.name(), html)
    }
}
