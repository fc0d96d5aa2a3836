//! Static subscription plan table shown during onboarding.
//!
//! The plan screen renders from this table rather than a network fetch so
//! the wizard works before a subscription exists server-side.

/// A selectable plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Monthly price in whole dollars; 0 for the free tier.
    pub monthly_price: u32,
    pub features: &'static [&'static str],
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "free",
        name: "Free",
        monthly_price: 0,
        features: &[
            "1 wallet",
            "Up to 2 participants",
            "Standard transaction reports",
        ],
    },
    Plan {
        id: "standard",
        name: "Standard",
        monthly_price: 29,
        features: &[
            "5 wallets",
            "Up to 20 participants",
            "Card ordering",
            "Priority support",
        ],
    },
    Plan {
        id: "premium",
        name: "Premium",
        monthly_price: 99,
        features: &[
            "Unlimited wallets",
            "Unlimited participants",
            "Card ordering",
            "Custom reporting",
            "Dedicated account manager",
        ],
    },
];

/// Look up a plan by id.
pub fn find(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}

impl Plan {
    pub fn is_free(&self) -> bool {
        self.monthly_price == 0
    }
}
