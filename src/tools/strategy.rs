//! A/B variation and content-strategy planning tools.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::llm::ToolDefinition;
use crate::scoring;

// ── generate_content_variations ───────────────────────────────────────────────

pub(super) fn generate_content_variations_spec() -> ToolDefinition {
    ToolDefinition {
        name: "generate_content_variations".to_string(),
        description: "Generate multiple A/B test variations optimized for different metrics \
                      (CTR, engagement, conversion)."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "base_content": { "type": "string", "description": "Original content" },
                "variation_types": {
                    "type": "array",
                    "items": { "type": "string", "enum": ["title", "intro", "cta", "tone", "structure"] }
                },
                "target_metrics": {
                    "type": "array",
                    "items": { "type": "string", "enum": ["ctr", "engagement", "conversion", "read_time"] }
                }
            },
            "required": ["base_content", "variation_types", "target_metrics"]
        }),
    }
}

#[derive(Deserialize)]
pub(super) struct ContentVariationsArgs {
    #[allow(dead_code)]
    base_content: String,
    variation_types: Vec<String>,
    target_metrics: Vec<String>,
}

pub(super) fn generate_content_variations(args: ContentVariationsArgs) -> Result<Value, AppError> {
    let metrics_label = args.target_metrics.join(", ");
    let variations: Vec<Value> = args
        .variation_types
        .iter()
        .map(|t| {
            json!({
                "type": t,
                "variant": format!("[{} Variation optimized for {metrics_label}]", t.to_uppercase()),
                "content": format!("Optimized {t} content here..."),
                "expectedImprovement": format!("+{}%", scoring::jitter_range(15.0, 45.0).floor()),
                "confidence": format!("{}%", scoring::jitter_range(75.0, 95.0).floor()),
                "targetMetrics": args.target_metrics.clone(),
                "testingRecommendation": "Run for 7-14 days with minimum 1000 impressions",
            })
        })
        .collect();

    let success_metric = args
        .target_metrics
        .first()
        .cloned()
        .unwrap_or_else(|| "ctr".to_string());

    Ok(json!({
        "totalVariations": variations.len(),
        "variations": variations,
        "testingPlan": {
            "duration": "14 days",
            "sampleSize": "2000 visitors minimum",
            "splitRatio": "50/50",
            "successCriteria": format!("{success_metric} improvement > 10%"),
        },
        "implementationSteps": [
            "Set up A/B testing tool",
            "Configure traffic split",
            "Monitor key metrics daily",
            "Wait for statistical significance",
            "Implement winning variant",
        ],
    }))
}

// ── create_content_strategy ───────────────────────────────────────────────────

pub(super) fn create_content_strategy_spec() -> ToolDefinition {
    ToolDefinition {
        name: "create_content_strategy".to_string(),
        description: "Develop comprehensive content strategy with calendar, KPIs, and resource \
                      allocation based on goals and timeframe."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "niche": { "type": "string" },
                "goals": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": ["awareness", "engagement", "conversion", "revenue", "authority"]
                    }
                },
                "timeframe": {
                    "type": "string",
                    "enum": ["1_week", "1_month", "3_months", "6_months"]
                },
                "resources": {
                    "type": "object",
                    "properties": {
                        "team_size": { "type": "number" },
                        "budget": { "type": "number" },
                        "tools_available": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "required": ["niche", "goals", "timeframe"]
        }),
    }
}

#[derive(Deserialize)]
pub(super) struct ContentStrategyArgs {
    niche: String,
    goals: Vec<String>,
    timeframe: String,
}

/// Total content pieces planned for each timeframe.
fn pieces_for_timeframe(timeframe: &str) -> Result<u32, AppError> {
    match timeframe {
        "1_week" => Ok(3),
        "1_month" => Ok(12),
        "3_months" => Ok(36),
        "6_months" => Ok(72),
        other => Err(AppError::Tool(format!("unknown timeframe: {other}"))),
    }
}

pub(super) fn create_content_strategy(args: ContentStrategyArgs) -> Result<Value, AppError> {
    let pieces = pieces_for_timeframe(&args.timeframe)?;
    let goals_label = args.goals.join(", ");

    let kpis: Vec<Value> = args
        .goals
        .iter()
        .map(|goal| {
            let target = match goal.as_str() {
                "revenue" => "+200%",
                "engagement" => "+150%",
                _ => "+100%",
            };
            json!({
                "metric": goal,
                "target": target,
                "measurement": "Monthly tracking via analytics dashboard",
            })
        })
        .collect();

    Ok(json!({
        "strategyOverview": format!(
            "Comprehensive {} strategy for {} focused on {goals_label}",
            args.timeframe.replace('_', " "),
            args.niche
        ),
        "contentCalendar": {
            "totalPieces": pieces,
            "breakdown": {
                "blog_posts": (pieces as f64 * 0.4).floor(),
                "social_media": (pieces as f64 * 0.3).floor(),
                "email_campaigns": (pieces as f64 * 0.2).floor(),
                "video_content": (pieces as f64 * 0.1).floor(),
            },
            "schedule": "2-3 pieces per week with strategic timing",
        },
        "kpis": kpis,
        "budgetAllocation": {
            "content_creation": "40%",
            "promotion": "30%",
            "tools_software": "20%",
            "training": "10%",
        },
        "expectedResults": {
            "trafficIncrease": "+150-300%",
            "revenueGrowth": "+200-400%",
            "engagementBoost": "+80-150%",
            "authorityBuilding": "Establish thought leadership position",
        },
        "actionItems": [
            "Set up content production workflow",
            "Create content templates and guidelines",
            "Establish promotion channels",
            "Implement analytics tracking",
            "Schedule weekly performance reviews",
        ],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variations_one_per_type() {
        let out = generate_content_variations(ContentVariationsArgs {
            base_content: "c".into(),
            variation_types: vec!["title".into(), "cta".into()],
            target_metrics: vec!["ctr".into(), "conversion".into()],
        })
        .unwrap();
        assert_eq!(out["totalVariations"], 2);
        assert_eq!(
            out["variations"][0]["variant"],
            "[TITLE Variation optimized for ctr, conversion]"
        );
        assert_eq!(out["testingPlan"]["successCriteria"], "ctr improvement > 10%");
    }

    #[test]
    fn strategy_calendar_scales_with_timeframe() {
        let out = create_content_strategy(ContentStrategyArgs {
            niche: "fintech".into(),
            goals: vec!["revenue".into(), "awareness".into()],
            timeframe: "3_months".into(),
        })
        .unwrap();
        assert_eq!(out["contentCalendar"]["totalPieces"], 36);
        assert_eq!(out["contentCalendar"]["breakdown"]["blog_posts"], 14.0);
        assert_eq!(out["kpis"][0]["target"], "+200%");
        assert_eq!(out["kpis"][1]["target"], "+100%");
    }

    #[test]
    fn strategy_rejects_unknown_timeframe() {
        let err = create_content_strategy(ContentStrategyArgs {
            niche: "x".into(),
            goals: vec![],
            timeframe: "1_decade".into(),
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Tool(_)));
    }
}
