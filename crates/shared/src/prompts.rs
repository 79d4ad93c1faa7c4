use crate::analyzer::BatchInsight;
use crate::models::NewsItem;

const HEADLINE_CHARS: usize = 80;
const DESCRIPTION_CHARS: usize = 100;

/// Numbered one-line digest of a batch, headlines and descriptions clipped
pub fn concise_batch_listing(batch: &[NewsItem]) -> String {
    batch
        .iter()
        .enumerate()
        .map(|(i, news)| {
            format!(
                "{}. {} - {}\n",
                i + 1,
                truncate_chars(&news.headline, HEADLINE_CHARS),
                truncate_chars(&news.description, DESCRIPTION_CHARS)
            )
        })
        .collect()
}

pub fn batch_prompt(batch: &[NewsItem], batch_num: usize, total_batches: usize) -> String {
    format!(
        r#"Extract structured insights from this news batch. Focus on specific companies, sectors, and actionable information.

NEWS BATCH {batch_num}/{total_batches}:
{listing}
Extract and organize:
1. SECTOR DEVELOPMENTS: Which sectors have significant news with specific company names and developments
2. STOCK RECOMMENDATIONS: Any buy/sell recommendations, analyst calls, or breakout stocks mentioned
3. EARNINGS/CORPORATE ACTIONS: Companies reporting results, dividends, business updates with specific numbers
4. MACRO/POLICY NEWS: Government policies, regulatory changes, economic developments affecting markets

Include specific company names, actual figures (revenue, profit, growth %), and concrete details from the news.
Keep response under 300 words but include all key details."#,
        listing = concise_batch_listing(batch)
    )
}

/// "Banking(3), Oil_Gas(1)" for every non-empty sector
pub fn sector_distribution(sector_summary: &[(String, usize)]) -> String {
    sector_summary
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(sector, count)| format!("{}({})", title_case(sector), count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn consolidation_prompt(
    insights: &[BatchInsight],
    sector_summary: &[(String, usize)],
    total_items: usize,
) -> String {
    let all_insights = insights
        .iter()
        .map(|insight| {
            let body = match &insight.outcome {
                Ok(text) => text.clone(),
                Err(e) => format!("[unavailable: {}]", e),
            };
            format!("BATCH {} INSIGHTS:\n{}", insight.batch_num, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a financial analyst. Create a structured report from these news insights in the EXACT format shown below.

SECTOR DISTRIBUTION: {sectors}
TOTAL NEWS ANALYZED: {total_items}

ALL BATCH INSIGHTS:
{all_insights}

FORMAT YOUR RESPONSE EXACTLY LIKE THIS:

**Key Sector Trends** 🌍📈
- Sector name: Brief description of trend/development with specific company names and details mentioned in the news
- Another sector: Description with company names and specific developments
- Continue for all major sectors with news

**Buy/Sell Opportunities** 💰🔍
- Buy: List specific stock names with brief reasoning (technical breakouts, earnings, analyst recommendations)
- Sell/Avoid: List stocks to avoid with reasoning
- Include specific targets/levels where mentioned

**Macro Implications** 🏦📉
- List broader economic/policy impacts that affect markets
- Include government policies, international developments, regulatory changes
- Focus on items that impact overall market sentiment

**Corporate Actions** 🗓️🏢
- List specific companies with earnings results, dividend announcements, business updates
- Include actual numbers (revenue growth %, profit figures, etc.) where available
- Mention upcoming earnings/events

Use bullet points with clear company names and specific details. Keep each point concise but informative with actual data from the news."#,
        sectors = sector_distribution(sector_summary),
    )
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Uppercase the first letter of every alphabetic run: "oil_gas" -> "Oil_Gas"
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
