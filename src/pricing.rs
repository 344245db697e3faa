//! Plan tiers and per-operation credit costs.

use serde::Serialize;

/// A subscription tier as shown on the pricing page and returned by the
/// dashboard endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PricingTier {
    pub name: &'static str,
    pub price_usd: u32,
    pub monthly_credits: u32,
    pub features: &'static [&'static str],
}

pub const STARTER: PricingTier = PricingTier {
    name: "Starter",
    price_usd: 0,
    monthly_credits: 100,
    features: &[
        "100 articles/month",
        "Basic AI journalists",
        "Standard news sources",
        "Manual publishing",
        "Basic analytics",
    ],
};

pub const PROFESSIONAL: PricingTier = PricingTier {
    name: "Professional",
    price_usd: 49,
    monthly_credits: 1000,
    features: &[
        "1,000 articles/month",
        "All AI journalists",
        "Premium news sources",
        "Multi-platform publishing",
        "Advanced analytics",
        "API access",
        "Priority support",
    ],
};

pub const ENTERPRISE: PricingTier = PricingTier {
    name: "Enterprise",
    price_usd: 199,
    monthly_credits: 5000,
    features: &[
        "Unlimited articles",
        "Custom AI journalists",
        "White-label solution",
        "Dedicated support",
        "Custom integrations",
        "Multi-user accounts",
        "SLA guarantee",
    ],
};

/// Look up a tier by its plan slug (the value stored on the user row).
pub fn tier_for_plan(plan: &str) -> &'static PricingTier {
    match plan {
        "professional" => &PROFESSIONAL,
        "enterprise" => &ENTERPRISE,
        _ => &STARTER,
    }
}

/// Credit cost per billable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateArticle,
    RewriteNews,
    OptimizeSeo,
    SearchNews,
    MultiPublish,
}

impl Operation {
    /// Credits debited when the operation runs.
    pub fn credit_cost(self) -> f64 {
        match self {
            Operation::GenerateArticle => 0.25,
            Operation::RewriteNews => 0.15,
            Operation::OptimizeSeo => 0.10,
            Operation::SearchNews => 0.05,
            Operation::MultiPublish => 0.20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_lookup_falls_back_to_starter() {
        assert_eq!(tier_for_plan("professional").name, "Professional");
        assert_eq!(tier_for_plan("enterprise").monthly_credits, 5000);
        assert_eq!(tier_for_plan("unknown").name, "Starter");
        assert_eq!(tier_for_plan("starter").price_usd, 0);
    }

    #[test]
    fn operation_costs_match_rate_card() {
        assert_eq!(Operation::GenerateArticle.credit_cost(), 0.25);
        assert_eq!(Operation::RewriteNews.credit_cost(), 0.15);
        assert_eq!(Operation::OptimizeSeo.credit_cost(), 0.10);
        assert_eq!(Operation::SearchNews.credit_cost(), 0.05);
        assert_eq!(Operation::MultiPublish.credit_cost(), 0.20);
    }
}
