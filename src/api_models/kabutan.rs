use serde::Serialize;

/// 株探の銘柄ページから抜き出した値。文字列のまま返す。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KabutanStockInfo {
    pub code: String,
    pub company_name: Option<String>,
    pub price: Option<String>,
    pub diff: Option<String>,
    pub diff_percent: Option<String>,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub close: Option<String>,
    pub volume: Option<String>,
    pub trading_value: Option<String>,
    pub per: Option<String>,
    pub pbr: Option<String>,
    pub dividend_yield: Option<String>,
    pub shares_outstanding: Option<String>,
    pub unit: Option<String>,
    pub industry: Option<String>,
}
