//! 图片地址解析
//!
//! 答题卡中的图片多为相对地址，需要结合门户主机和题库路径补全

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::models::BilingualVariants;

pub const SSC_HOST: &str = "https://ssc.digialm.com";
pub const RRB_HOST: &str = "https://rrb.digialm.com";

static TOUCHSTONE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://[A-Za-z0-9.-]+)?(/per/g\d+/pub/\d+/touchstone/)").unwrap()
});

static LANGUAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)_(HI|EN|hi|en)(\.[A-Za-z0-9]+)$").unwrap());

/// 图片基础地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    /// 门户主机（ssc / rrb），根路径图片拼接到这里，不带结尾斜杠
    host: String,
    /// 以斜杠结尾的完整前缀
    prefix: String,
}

impl BaseUrl {
    /// 从文档内容和来源地址推断基础地址
    ///
    /// 文档或来源地址提到 rrb 门户时门户主机为 rrb，否则为 ssc；
    /// 题库前缀沿用文档里出现的主机和协议，没有时使用门户主机
    pub fn detect(raw_html: &str, source_url: Option<&str>) -> Self {
        let mentions_rrb = raw_html.contains("rrb.digialm.com")
            || source_url.is_some_and(|u| u.contains("rrb.digialm.com"));

        let default_host = if mentions_rrb { RRB_HOST } else { SSC_HOST };

        let Some(caps) = TOUCHSTONE_PATH.captures(raw_html) else {
            debug!("未找到题库路径，仅使用主机 {}", default_host);
            return Self {
                host: default_host.to_string(),
                prefix: format!("{}/", default_host),
            };
        };

        let asset_host = caps.get(1).map_or(default_host, |h| h.as_str());
        let prefix = format!("{}{}", asset_host, &caps[2]);

        debug!("图片基础地址: {}", prefix);
        Self {
            host: default_host.to_string(),
            prefix,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

/// 将图片 src 补全为绝对地址
///
/// 空 src 返回 None；已带协议的地址原样返回；根路径拼接到门户主机
pub fn resolve_image_url(src: &str, base: &BaseUrl) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    if Url::parse(src).is_ok() {
        return Some(src.to_string());
    }
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }
    if src.starts_with('/') {
        return Some(format!("{}{}", base.host(), src));
    }

    Some(format!("{}{}", base.as_str(), src))
}

/// 推导同一图片的印地语 / 英语版本
///
/// 文件名不带 `_HI` / `_EN` 标记时两个版本都为 None
pub fn bilingual_variants(url: &str) -> BilingualVariants {
    let Some(caps) = LANGUAGE_MARKER.captures(url) else {
        return BilingualVariants::default();
    };

    let stem = &caps[1];
    let marker = &caps[2];
    let ext = &caps[3];
    let lowercase = marker.chars().all(|c| c.is_ascii_lowercase());
    let (hi, en) = if lowercase { ("hi", "en") } else { ("HI", "EN") };

    BilingualVariants {
        hindi_url: Some(format!("{}_{}{}", stem, hi, ext)),
        english_url: Some(format!("{}_{}{}", stem, en, ext)),
    }
}

/// 切换到另一种语言的图片地址，连续调用两次回到原地址
pub fn toggle_language(url: &str) -> Option<String> {
    let caps = LANGUAGE_MARKER.captures(url)?;
    let swapped = match &caps[2] {
        "HI" => "EN",
        "EN" => "HI",
        "hi" => "en",
        _ => "hi",
    };
    Some(format!("{}_{}{}", &caps[1], swapped, &caps[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET_WITH_PATH: &str =
        r#"<img src="/per/g27/pub/2207/touchstone/AssessmentQPHTMLMode1/q1.jpg">"#;

    #[test]
    fn test_detects_touchstone_path() {
        let base = BaseUrl::detect(SHEET_WITH_PATH, None);
        assert_eq!(
            base.as_str(),
            "https://ssc.digialm.com/per/g27/pub/2207/touchstone/"
        );
    }

    #[test]
    fn test_rrb_host_from_source_url() {
        let base = BaseUrl::detect(
            SHEET_WITH_PATH,
            Some("https://rrb.digialm.com/per/g28/pub/32874/touchstone/x.html"),
        );
        assert_eq!(base.host(), RRB_HOST);
    }

    #[test]
    fn test_absolute_host_in_document_wins() {
        let html = r#"<img src="https://cdn3.digialm.com/per/g01/pub/585/touchstone/a.png">"#;
        let base = BaseUrl::detect(html, None);
        assert_eq!(base.as_str(), "https://cdn3.digialm.com/per/g01/pub/585/touchstone/");
    }

    #[test]
    fn test_root_relative_src_uses_portal_host() {
        let html = r#"<img src="https://cdn3.digialm.com/per/g27/pub/2207/touchstone/a.png">"#;
        let base = BaseUrl::detect(html, None);

        assert_eq!(
            resolve_image_url("/per/x.png", &base).as_deref(),
            Some("https://ssc.digialm.com/per/x.png")
        );
        assert_eq!(
            resolve_image_url("b.png", &base).as_deref(),
            Some("https://cdn3.digialm.com/per/g27/pub/2207/touchstone/b.png")
        );
    }

    #[test]
    fn test_document_scheme_is_kept_for_prefix() {
        let html = r#"<img src="http://rrb.digialm.com/per/g28/pub/1/touchstone/a.png">"#;
        let base = BaseUrl::detect(html, None);

        assert_eq!(base.as_str(), "http://rrb.digialm.com/per/g28/pub/1/touchstone/");
        assert_eq!(
            resolve_image_url("/per/x.png", &base).as_deref(),
            Some("https://rrb.digialm.com/per/x.png")
        );
    }

    #[test]
    fn test_missing_path_falls_back_to_host() {
        let base = BaseUrl::detect("<p>no images</p>", None);
        assert_eq!(base.as_str(), "https://ssc.digialm.com/");
    }

    #[test]
    fn test_resolve_image_url_variants() {
        let base = BaseUrl::detect(SHEET_WITH_PATH, None);

        assert_eq!(resolve_image_url("", &base), None);
        assert_eq!(
            resolve_image_url("https://x.org/a.png", &base).as_deref(),
            Some("https://x.org/a.png")
        );
        assert_eq!(
            resolve_image_url("//x.org/a.png", &base).as_deref(),
            Some("https://x.org/a.png")
        );
        assert_eq!(
            resolve_image_url("/per/a.png", &base).as_deref(),
            Some("https://ssc.digialm.com/per/a.png")
        );
        assert_eq!(
            resolve_image_url("AssessmentQPHTMLMode1/q1.jpg", &base).as_deref(),
            Some("https://ssc.digialm.com/per/g27/pub/2207/touchstone/AssessmentQPHTMLMode1/q1.jpg")
        );
    }

    #[test]
    fn test_bilingual_variants_preserve_case() {
        let upper = bilingual_variants("https://h/q12_HI.jpg");
        assert_eq!(upper.hindi_url.as_deref(), Some("https://h/q12_HI.jpg"));
        assert_eq!(upper.english_url.as_deref(), Some("https://h/q12_EN.jpg"));

        let lower = bilingual_variants("https://h/q12_en.png");
        assert_eq!(lower.hindi_url.as_deref(), Some("https://h/q12_hi.png"));

        assert_eq!(bilingual_variants("https://h/q12.jpg"), BilingualVariants::default());
    }

    #[test]
    fn test_toggle_language_is_involutive() {
        let url = "https://h/q12_HI.jpg";
        let once = toggle_language(url).unwrap();
        assert_eq!(once, "https://h/q12_EN.jpg");
        assert_eq!(toggle_language(&once).as_deref(), Some(url));
        assert_eq!(toggle_language("https://h/plain.jpg"), None);
    }
}
