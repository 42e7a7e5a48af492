/// Column-name constants for the two input tables.
/// The upstream analysis exports its headers in Korean.

// ── Risk table (CSV) ────────────────────────────────────────────────────────
pub mod risk {
    pub const REGION: &str = "지역명";
    pub const ITEM: &str = "품목명";
    pub const CLIMATE_SEASON: &str = "기후계절_유형";
    pub const MAJOR_RISK_CATEGORY: &str = "대분류_유형";
    pub const MANAGEMENT_TYPE: &str = "리스크관리_유형";
    pub const CLIMATE_RESILIENCE_SCORE: &str = "기후회복력점수";
    pub const REGIONAL_PORTFOLIO_INDEX: &str = "지역기후포트폴리오지수";
    pub const PRICE_VOLATILITY_ALERT: &str = "가격변동성경보";
    pub const SHIPMENT_TIMING_INDEX: &str = "출하최적기지수";
    pub const GROWTH_CYCLE_RISK_INDEX: &str = "생육주기리스크지수";
}

// ── Income / distribution table (XLSX) ──────────────────────────────────────
pub mod income {
    pub const ITEM: &str = "품목명";
    pub const CONVENTIONAL_RECEIPT_RATE: &str = "관행_수취율(%)";
    pub const DIRECT_RECEIPT_RATE: &str = "직거래_수취율(%)";
    pub const CONVENTIONAL_COST_RATE: &str = "관행_유통비용률(%)";
    pub const DIRECT_COST_RATE: &str = "직거래_유통비용률(%)";
    pub const INCOME_RECOVERY_INDEX: &str = "소득회복지수(%)";
}

// ── Default file names ──────────────────────────────────────────────────────
pub mod files {
    pub const RISK_TABLE: &str = "농업_리스크관리유형_최종분석_보고서_v2.csv";
    pub const INCOME_TABLE: &str = "품목별_유통구조_소득분석.xlsx";
}
