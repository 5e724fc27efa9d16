use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use thiserror::Error;

use crate::api_models::kabutan::KabutanStockInfo;
use crate::services::ServiceError;

#[derive(Debug, Error)]
pub enum KabutanError {
    #[error("kabutan http error: {0}")]
    Http(#[from] reqwest::Error),
}

static STOCK_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4,5}$").unwrap());

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new(concat!("(?s)", $re)).unwrap());
    };
}

pattern!(COMPANY_NAME_JP, r#"<h3[^>]*class="jp"[^>]*>([^<\r\n]+)</h3>"#);
pattern!(COMPANY_NAME, r#"<h3[^>]*>([^<\r\n]+)</h3>"#);
pattern!(PRICE, r#"<span class="kabuka">([\d,\.]+)円</span>"#);
pattern!(DIFF, r#"<dt>前日比</dt>\s*<dd><span.*?>([+\-\d\.]+)</span></dd>"#);
pattern!(
    DIFF_PERCENT,
    r#"<dt>前日比</dt>\s*<dd><span.*?>[+\-\d\.]+</span></dd>\s*<dd><span.*?>([+\-\d\.]+)</span>%</dd>"#
);
pattern!(OPEN, r#"<th[^>]*>始値</th>\s*<td>([\d,\.]+)</td>"#);
pattern!(HIGH, r#"<th[^>]*>高値</th>\s*<td>([\d,\.]+)</td>"#);
pattern!(LOW, r#"<th[^>]*>安値</th>\s*<td>([\d,\.]+)</td>"#);
pattern!(CLOSE, r#"<th[^>]*>終値</th>\s*<td>([\d,\.]+)</td>"#);
pattern!(VOLUME, r#"<th[^>]*>出来高</th>\s*<td>([\d,]+)[^<]*株</td>"#);
pattern!(TRADING_VALUE, r#"<th[^>]*>売買代金</th>\s*<td>([\d,]+)[^<]*百万円</td>"#);
// PER と PBR は同じ形のセル。1 つ目が PER、2 つ目が PBR
pattern!(TIMES_CELL, r#"<td>([\d\.]+)<span[^>]*>倍</span></td>"#);
pattern!(PERCENT_CELL, r#"<td>([\d\.]+)<span[^>]*>％</span></td>"#);
pattern!(SHARES_OUTSTANDING, r#"<th[^>]*>発行済株式数</th>\s*<td>([\d,]+)[^<]*株</td>"#);
pattern!(UNIT, r#"<th[^>]*>単元株数</th>\s*<td>([\d,]+)[^<]*株</td>"#);
pattern!(INDUSTRY, r#"<th[^>]*>業種</th>\s*<td>([^<]+)</td>"#);

pub fn is_valid_code(code: &str) -> bool {
    STOCK_CODE.is_match(code)
}

/// Group 1 of the `nth` (1-based) match, trimmed.
fn extract(re: &Regex, html: &str, nth: usize) -> Option<String> {
    re.captures_iter(html)
        .nth(nth.saturating_sub(1))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn parse_stock_page(code: &str, html: &str) -> KabutanStockInfo {
    KabutanStockInfo {
        code: code.to_string(),
        company_name: extract(&COMPANY_NAME_JP, html, 1).or_else(|| extract(&COMPANY_NAME, html, 1)),
        price: extract(&PRICE, html, 1),
        diff: extract(&DIFF, html, 1),
        diff_percent: extract(&DIFF_PERCENT, html, 1),
        open: extract(&OPEN, html, 1),
        high: extract(&HIGH, html, 1),
        low: extract(&LOW, html, 1),
        close: extract(&CLOSE, html, 1),
        volume: extract(&VOLUME, html, 1),
        trading_value: extract(&TRADING_VALUE, html, 1),
        per: extract(&TIMES_CELL, html, 1),
        pbr: extract(&TIMES_CELL, html, 2),
        dividend_yield: extract(&PERCENT_CELL, html, 1),
        shares_outstanding: extract(&SHARES_OUTSTANDING, html, 1),
        unit: extract(&UNIT, html, 1),
        industry: extract(&INDUSTRY, html, 1),
    }
}

/// 株探の銘柄ページを取得して解析する。株価が取れなければ NotFound。
pub async fn fetch_stock_info(http: &Client, base_url: &str, code: &str) -> Result<KabutanStockInfo, ServiceError> {
    if !is_valid_code(code) {
        return Err(ServiceError::Validation(
            "証券コードは4桁または5桁の数字で指定してください。".to_string(),
        ));
    }

    let url = format!("{}/stock/", base_url);
    let html = http
        .get(&url)
        .query(&[("code", code)])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(KabutanError::Http)?
        .text()
        .await
        .map_err(KabutanError::Http)?;

    let info = parse_stock_page(code, &html);
    if info.price.as_deref().map_or(true, str::is_empty) {
        tracing::warn!("no price found on kabutan page for {}", code);
        return Err(ServiceError::NotFound("株価データが取得できませんでした。".to_string()));
    }
    Ok(info)
}
