//! Revenue analysis tools.
//!
//! `revenue_intelligence` aggregates real article revenue rows from the
//! database; `analyze_revenue` is the advanced projection variant built on
//! jittered estimates.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::llm::ToolDefinition;
use crate::scoring;

use super::ToolContext;

// ── revenue_intelligence ──────────────────────────────────────────────────────

pub(super) fn revenue_intelligence_spec() -> ToolDefinition {
    ToolDefinition {
        name: "revenue_intelligence".to_string(),
        description: "Analyze revenue trends and provide business intelligence insights with \
                      real data"
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "period": { "type": "string", "description": "Time period to analyze" },
                "metric": { "type": "string", "description": "Metric to analyze" }
            },
            "required": ["period", "metric"]
        }),
    }
}

#[derive(Deserialize)]
pub(super) struct RevenueIntelligenceArgs {
    period: String,
    metric: String,
}

pub(super) fn revenue_intelligence(
    args: RevenueIntelligenceArgs,
    ctx: &ToolContext,
) -> Result<Value, AppError> {
    let rows = match ctx.db.revenue_rows(&ctx.user.id, 100) {
        Ok(rows) => rows,
        Err(_) => {
            return Ok(json!({
                "error": "Unable to fetch revenue data",
                "period": args.period,
                "metric": args.metric,
                "note": "No revenue data available yet. Start creating articles to track performance.",
            }));
        }
    };

    let total_revenue: f64 = rows.iter().map(|r| r.revenue_total).sum();
    let total_views: i64 = rows.iter().map(|r| r.views).sum();
    let avg_per_article = if rows.is_empty() {
        0.0
    } else {
        total_revenue / rows.len() as f64
    };
    let revenue_per_view = if total_views > 0 {
        total_revenue / total_views as f64
    } else {
        0.0
    };
    let adsense: f64 = rows.iter().map(|r| r.revenue_adsense).sum();
    let affiliate: f64 = rows.iter().map(|r| r.revenue_affiliate).sum();
    let sponsored: f64 = rows.iter().map(|r| r.revenue_sponsored).sum();

    let trend = if total_revenue > 1000.0 {
        "strong growth"
    } else if total_revenue > 100.0 {
        "moderate growth"
    } else {
        "early stage"
    };
    let recommendation = if total_revenue > 1000.0 {
        "Scale successful content types and increase output"
    } else {
        "Focus on high-performing topics and improve SEO"
    };

    Ok(json!({
        "period": args.period,
        "metric": args.metric,
        "totalRevenue": format!("${total_revenue:.2}"),
        "totalViews": total_views,
        "articlesAnalyzed": rows.len(),
        "avgRevenuePerArticle": format!("${avg_per_article:.2}"),
        "revenuePerView": format!("${revenue_per_view:.4}"),
        "breakdown": {
            "adsense": format!("${adsense:.2}"),
            "affiliate": format!("${affiliate:.2}"),
            "sponsored": format!("${sponsored:.2}"),
        },
        "trend": trend,
        "recommendation": recommendation,
    }))
}

// ── analyze_revenue (advanced) ────────────────────────────────────────────────

pub(super) fn analyze_revenue_spec() -> ToolDefinition {
    ToolDefinition {
        name: "analyze_revenue".to_string(),
        description: "Comprehensive revenue potential analysis with specific optimization \
                      strategies and ROI projections."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "content": { "type": "string", "description": "Article content to analyze" },
                "niche": { "type": "string", "description": "Market niche" },
                "target_audience": { "type": "string", "description": "Primary target audience" },
                "current_performance": {
                    "type": "object",
                    "properties": {
                        "views": { "type": "number" },
                        "engagement_rate": { "type": "number" },
                        "current_revenue": { "type": "number" }
                    }
                }
            },
            "required": ["content", "niche", "target_audience"]
        }),
    }
}

#[derive(Deserialize)]
pub(super) struct AnalyzeRevenueArgs {
    #[allow(dead_code)]
    content: String,
    #[allow(dead_code)]
    niche: String,
    #[allow(dead_code)]
    target_audience: String,
    #[serde(default)]
    current_performance: Option<CurrentPerformance>,
}

#[derive(Deserialize)]
pub(super) struct CurrentPerformance {
    #[serde(default)]
    current_revenue: Option<f64>,
}

pub(super) fn analyze_revenue(args: AnalyzeRevenueArgs) -> Result<Value, AppError> {
    let base_revenue = 500.0 + scoring::jitter_range(0.0, 2000.0);
    let optimized_revenue = base_revenue * (1.5 + scoring::jitter_range(0.0, 0.5));

    let current_roi = args
        .current_performance
        .as_ref()
        .and_then(|p| p.current_revenue)
        .map(|r| format!("${r}/month"))
        .unwrap_or_else(|| "No baseline".to_string());

    Ok(json!({
        "revenueScore": (70.0 + scoring::jitter_range(0.0, 30.0)).floor(),
        "projectedRevenue": {
            "monthlyRealistic": format!("${base_revenue:.2}"),
            "monthlyOptimized": format!("${optimized_revenue:.2}"),
            "yearlyProjection": format!("${:.2}", optimized_revenue * 12.0),
        },
        "optimizations": [
            {
                "type": "Ad Placement",
                "impact": "High",
                "estimatedIncrease": format!("+${:.2}/month", scoring::jitter_range(100.0, 400.0)),
                "implementation": "Add strategic ad units after 2nd and 4th paragraphs",
                "difficulty": "Easy",
            },
            {
                "type": "Affiliate Links",
                "impact": "Medium",
                "estimatedIncrease": format!("+${:.2}/month", scoring::jitter_range(50.0, 250.0)),
                "implementation": "Integrate 3-5 relevant affiliate products naturally",
                "difficulty": "Medium",
            },
            {
                "type": "Content Upgrade",
                "impact": "High",
                "estimatedIncrease": format!("+${:.2}/month", scoring::jitter_range(150.0, 550.0)),
                "implementation": "Create downloadable resource to capture emails",
                "difficulty": "Medium",
            },
            {
                "type": "SEO Optimization",
                "impact": "Very High",
                "estimatedIncrease": format!("+${:.2}/month", scoring::jitter_range(200.0, 700.0)),
                "implementation": "Target high-volume keywords with commercial intent",
                "difficulty": "Hard",
            },
        ],
        "roiAnalysis": {
            "currentROI": current_roi,
            "potentialROI": format!("+{}%", (50.0 + scoring::jitter_range(0.0, 100.0)).floor()),
            "paybackPeriod": "2-3 months",
            "confidenceLevel": "85%",
        },
        "competitorBenchmark": {
            "averageRevenue": format!("${:.2}", base_revenue * 0.8),
            "topPerformers": format!("${:.2}", optimized_revenue * 1.3),
            "yourPosition": "Above average with optimization potential",
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;
    use crate::db::{Db, NewArticle};
    use crate::news::NewsClient;
    use crate::tools::ToolContext;
    use rusqlite::params;

    fn ctx() -> ToolContext {
        let db = Db::open_in_memory().unwrap();
        let user = db.create_user("a@b.c", "d", "Ada").unwrap();
        let news = NewsClient::new(
            &NewsConfig { base_url: "https://newsapi.org/v2".into(), page_size: 20 },
            None,
        )
        .unwrap();
        ToolContext { db, news, user, context: Value::Null }
    }

    #[test]
    fn intelligence_on_empty_library_reports_early_stage() {
        let out = revenue_intelligence(
            RevenueIntelligenceArgs { period: "30d".into(), metric: "revenue".into() },
            &ctx(),
        )
        .unwrap();
        assert_eq!(out["articlesAnalyzed"], 0);
        assert_eq!(out["trend"], "early stage");
        assert_eq!(out["totalRevenue"], "$0.00");
    }

    #[test]
    fn intelligence_aggregates_revenue_columns() {
        let ctx = ctx();
        let id = ctx
            .db
            .insert_article(
                &ctx.user.id,
                &NewArticle { title: "t".into(), niche: "tech".into(), status: "published".into(), ..Default::default() },
            )
            .unwrap();
        ctx.db
            .conn()
            .execute(
                "UPDATE news_articles SET revenue_total = 1500, revenue_adsense = 900, \
                 revenue_affiliate = 400, revenue_sponsored = 200, views = 3000 WHERE id = ?1",
                params![id],
            )
            .unwrap();

        let out = revenue_intelligence(
            RevenueIntelligenceArgs { period: "30d".into(), metric: "revenue".into() },
            &ctx,
        )
        .unwrap();
        assert_eq!(out["totalRevenue"], "$1500.00");
        assert_eq!(out["breakdown"]["adsense"], "$900.00");
        assert_eq!(out["trend"], "strong growth");
        assert_eq!(out["revenuePerView"], "$0.5000");
    }

    #[test]
    fn analyze_revenue_projections_are_ordered() {
        let out = analyze_revenue(AnalyzeRevenueArgs {
            content: "c".into(),
            niche: "tech".into(),
            target_audience: "devs".into(),
            current_performance: Some(CurrentPerformance { current_revenue: Some(120.0) }),
        })
        .unwrap();

        let realistic: f64 = out["projectedRevenue"]["monthlyRealistic"]
            .as_str()
            .unwrap()
            .trim_start_matches('$')
            .parse()
            .unwrap();
        let optimized: f64 = out["projectedRevenue"]["monthlyOptimized"]
            .as_str()
            .unwrap()
            .trim_start_matches('$')
            .parse()
            .unwrap();
        assert!(optimized > realistic);
        assert_eq!(out["roiAnalysis"]["currentROI"], "$120/month");
        assert_eq!(out["optimizations"].as_array().unwrap().len(), 4);
    }
}
