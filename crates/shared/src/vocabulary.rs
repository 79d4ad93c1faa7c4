//! Default keyword tables used for scoring and sector classification.

/// Corporate-action, earnings and analyst-action terms (+3 each)
pub const HIGH_IMPACT_TERMS: &[&str] = &[
    "results",
    "earnings",
    "profit",
    "loss",
    "merger",
    "acquisition",
    "ipo",
    "dividend",
    "buyback",
    "split",
    "delisting",
    "rating",
    "upgrade",
    "downgrade",
    "target",
    "recommendation",
    "guidance",
    "breakout",
    "revenue",
    "ebitda",
    "margin",
    "growth",
    "order win",
    "order book",
    "contract",
    "stake",
    "bonus issue",
    "rights issue",
    "fundraise",
    "qip",
    "block deal",
    "bulk deal",
    "outlook",
    "forecast",
    "beats estimates",
    "misses estimates",
    "record high",
    "52-week high",
    "52-week low",
    "rally",
    "plunge",
    "surge",
    "default",
    "insolvency",
    "demerger",
];

/// Macro, regulatory, index and global-market terms (+2 each)
pub const MARKET_MOVER_TERMS: &[&str] = &[
    "fii",
    "dii",
    "rbi",
    "sebi",
    "government",
    "policy",
    "tax",
    "interest rate",
    "inflation",
    "gdp",
    "budget",
    "repo rate",
    "monetary",
    "fiscal",
    "gst",
    "cpi",
    "wpi",
    "iip",
    "fed",
    "federal reserve",
    "treasury",
    "bond yield",
    "rupee",
    "dollar",
    "forex",
    "crude",
    "brent",
    "opec",
    "gold",
    "nifty",
    "sensex",
    "bank nifty",
    "midcap",
    "smallcap",
    "breakout",
    "vix",
    "tariff",
    "trade deal",
    "sanctions",
    "recession",
    "monsoon",
    "election",
    "ministry",
    "regulator",
    "stimulus",
    "liquidity",
    "china",
    "us market",
    "wall street",
    "global cues",
];

/// Sector keyword table. Order matters: the first sector with a match wins.
pub const SECTOR_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "banking",
        &["bank", "icici", "hdfc", "sbi", "axis", "kotak", "npa", "credit"],
    ),
    (
        "technology",
        &["tech", "it", "infosys", "tcs", "wipro", "software", "digital"],
    ),
    (
        "pharma",
        &["pharma", "drug", "medicine", "fda", "reddy", "sun pharma", "cipla"],
    ),
    (
        "power",
        &["power", "ntpc", "renewable", "energy", "coal", "electricity"],
    ),
    (
        "auto",
        &["auto", "car", "motor", "tata motors", "hyundai", "maruti"],
    ),
    (
        "fmcg",
        &["fmcg", "consumer", "itc", "hindustan unilever", "nestle"],
    ),
    (
        "metals",
        &["metal", "steel", "iron", "copper", "aluminum", "tata steel"],
    ),
    (
        "oil_gas",
        &["oil", "gas", "petroleum", "reliance", "ongc", "crude"],
    ),
    (
        "realty",
        &["real estate", "property", "construction", "housing"],
    ),
    (
        "aviation",
        &["aviation", "airline", "aircraft", "airport", "indigo", "air india"],
    ),
];

/// Bucket for items no sector claims
pub const GENERAL_SECTOR: &str = "general";
