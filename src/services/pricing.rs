use crate::models::{Frequency, Language};

/// Surcharge per cat beyond the first, per visit.
const EXTRA_CAT_FEE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTier {
    Essential,
    CarePlus,
    Ultimate,
}

impl PlanTier {
    /// Plan labels are free-form strings (they may carry a discount suffix
    /// and appear in either language), so the tier is recovered by
    /// substring match. Anything unrecognized is Essential.
    pub fn from_label(label: &str) -> Self {
        if label.contains("Care Plus") || label.contains("优享版") {
            return PlanTier::CarePlus;
        }
        if label.contains("Ultimate") || label.contains("尊享版") {
            return PlanTier::Ultimate;
        }
        PlanTier::Essential
    }

    pub fn base_price(self) -> f64 {
        match self {
            PlanTier::Essential => 10.0,
            PlanTier::CarePlus => 15.0,
            PlanTier::Ultimate => 20.0,
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (PlanTier::Essential, Language::English) => "Essential",
            (PlanTier::Essential, Language::Chinese) => "基础版",
            (PlanTier::CarePlus, Language::English) => "Care Plus",
            (PlanTier::CarePlus, Language::Chinese) => "优享版",
            (PlanTier::Ultimate, Language::English) => "Ultimate",
            (PlanTier::Ultimate, Language::Chinese) => "尊享版",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountBadge {
    FivePercent,
    TenPercent,
}

impl DiscountBadge {
    pub fn label(self) -> &'static str {
        match self {
            DiscountBadge::FivePercent => "5% OFF",
            DiscountBadge::TenPercent => "10% OFF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceResult {
    /// Computed weekly total in dollars plus the applied discount, if any.
    Weekly {
        total: f64,
        discount: Option<DiscountBadge>,
    },
    /// 7+ visits per week: manually quoted, nothing to compute.
    CustomQuote,
}

impl PriceResult {
    pub fn display(&self, language: Language) -> String {
        match self {
            PriceResult::Weekly { total, .. } => format!("${}", format_amount(*total)),
            PriceResult::CustomQuote => match language {
                Language::English => "Quote (Contact Us)".to_string(),
                Language::Chinese => "联系定制".to_string(),
            },
        }
    }
}

pub fn discount_badge(frequency: u8) -> Option<DiscountBadge> {
    match frequency {
        4..=5 => Some(DiscountBadge::FivePercent),
        6.. => Some(DiscountBadge::TenPercent),
        _ => None,
    }
}

fn discount_rate(frequency: u8) -> f64 {
    match discount_badge(frequency) {
        Some(DiscountBadge::FivePercent) => 0.95,
        Some(DiscountBadge::TenPercent) => 0.90,
        None => 1.0,
    }
}

/// Weekly price for a plan tier, cat count and visit frequency. Pure and
/// deterministic: the live preview, the confirmation step and the email
/// templates all go through here so they can never disagree.
pub fn compute_price(plan: PlanTier, num_cats: u32, frequency: Frequency) -> PriceResult {
    let per_week = match frequency {
        Frequency::PerWeek(n) => n,
        Frequency::Custom => return PriceResult::CustomQuote,
    };

    let extra_cat_fee = (num_cats.max(1) - 1) as f64 * EXTRA_CAT_FEE;
    let subtotal_per_visit = plan.base_price() + extra_cat_fee;
    let total = subtotal_per_visit * discount_rate(per_week) * f64::from(per_week);

    PriceResult::Weekly {
        total,
        discount: discount_badge(per_week),
    }
}

/// Two decimal places with trailing zeroes stripped: 76.00 -> "76",
/// 10.50 -> "10.5", 20.9 -> "20.9".
fn format_amount(total: f64) -> String {
    let s = format!("{total:.2}");
    if let Some(whole) = s.strip_suffix(".00") {
        return whole.to_string();
    }
    if let Some(short) = s.strip_suffix('0') {
        return short.to_string();
    }
    s
}
