//! Tier Catalog
//!
//! Pricing tiers are immutable configuration: the catalog is built once at
//! startup (either the built-in founders catalog or an operator-supplied
//! JSON file) and shared read-only by the server and the web frontend.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PresaleError, Result};

/// Tier identifier (e.g. `analyzer_lifetime_founder`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(String);

impl TierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `small_firm_monthly` -> `Small Firm Monthly`
    pub fn title_case(&self) -> String {
        self.0
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for TierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TierId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How a paid tier is billed (display only; every presale seat is a single payment)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Billing {
    OneTime,
    Monthly,
    Annual,
    Lifetime,
}

impl Billing {
    /// Suffix rendered after the price
    pub fn suffix(self) -> &'static str {
        match self {
            Billing::OneTime => "",
            Billing::Monthly => "/month",
            Billing::Annual => "/year",
            Billing::Lifetime => " lifetime",
        }
    }
}

/// A named pricing/feature bundle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub label: String,
    pub tagline: String,

    /// Price in US cents; `None` means the tier is free and joins the waitlist
    #[serde(default)]
    pub price_cents: Option<i64>,

    pub billing: Billing,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub highlighted: bool,
}

impl Tier {
    pub fn is_free(&self) -> bool {
        self.price_cents.is_none()
    }

    /// Product name shown on the hosted checkout page
    pub fn checkout_name(&self) -> String {
        format!("4D LegalTech AI - {} (Presale Seat)", self.label)
    }

    /// `$49 lifetime`, `$249/month`, `Free`
    pub fn display_price(&self) -> String {
        match self.price_cents {
            Some(cents) => format!("{}{}", format_usd(cents), self.billing.suffix()),
            None => "Free".into(),
        }
    }
}

/// Immutable, validated set of tiers
#[derive(Clone, Debug)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl TierCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and non-positive prices
    pub fn new(tiers: Vec<Tier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(PresaleError::Config("tier catalog is empty".into()));
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if !seen.insert(tier.id.clone()) {
                return Err(PresaleError::Config(format!("duplicate tier id: {}", tier.id)));
            }
            if matches!(tier.price_cents, Some(cents) if cents <= 0) {
                return Err(PresaleError::Config(format!(
                    "tier {} has a non-positive price; omit price_cents for free tiers",
                    tier.id
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// Parse a JSON array of tiers
    pub fn from_json(json: &str) -> Result<Self> {
        let tiers: Vec<Tier> = serde_json::from_str(json)?;
        Self::new(tiers)
    }

    /// Load a JSON catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PresaleError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Look up a tier by id
    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id.as_str() == id)
    }

    /// Look up a tier, failing with [`PresaleError::InvalidTier`]
    pub fn require(&self, id: &str) -> Result<&Tier> {
        self.get(id).ok_or_else(|| PresaleError::InvalidTier(id.to_string()))
    }

    /// Tiers that go through checkout
    pub fn paid(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter().filter(|t| !t.is_free())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The built-in presale catalog
    pub fn founders() -> Self {
        Self {
            tiers: founder_tiers(),
        }
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::founders()
    }
}

fn tier(
    id: &str,
    label: &str,
    tagline: &str,
    price_cents: Option<i64>,
    billing: Billing,
    features: &[&str],
) -> Tier {
    Tier {
        id: TierId::new(id),
        label: label.into(),
        tagline: tagline.into(),
        price_cents,
        billing,
        features: features.iter().map(|f| (*f).to_string()).collect(),
        highlighted: false,
    }
}

fn founder_tiers() -> Vec<Tier> {
    let mut tiers = vec![
        tier(
            "supporter",
            "Justice Movement Supporter",
            "Join the waitlist and back the mission",
            None,
            Billing::OneTime,
            &[
                "Name on Founding Fathers/Mothers Wall",
                "Public thank-you recognition",
                "Access to community updates",
                "Movement supporter badge",
                "Basic educational resources",
            ],
        ),
        tier(
            "analyzer_lifetime_founder",
            "Analyzer Lifetime Founder",
            "Pay once, keep the Analyzer forever",
            Some(4_900),
            Billing::Lifetime,
            &[
                "Lifetime platform access (no recurring fees ever)",
                "Complete IRAC Analysis Engine with 5+ professional reports",
                "Advanced DARVO pattern detection & evidence chronology",
                "Priority email support & onboarding assistance",
                "Founder badge & exclusive community access",
                "All future Analyzer tier updates included",
                "Early access to new AI features",
            ],
        ),
        tier(
            "analyzer_annual_founder",
            "Analyzer Annual Founder",
            "A full year of the Analyzer at founder pricing",
            Some(2_000),
            Billing::Annual,
            &[
                "Full year of premium Analyzer access",
                "Complete IRAC Analysis Engine with 5+ professional reports",
                "Advanced DARVO pattern detection & evidence chronology",
                "Priority email support throughout your year",
                "Founder badge & special recognition",
                "Quarterly founder Q&A sessions",
                "50% discount on renewal after year one",
            ],
        ),
        tier(
            "parent_single_case",
            "Parent Single-Case License",
            "Everything you need for one custody case",
            Some(16_500),
            Billing::OneTime,
            &[
                "Full analysis of one family-law case",
                "Evidence timeline and event clustering",
                "Evidence quality grading with explainable insights",
                "Exportable case summary for your attorney",
                "Priority email support",
            ],
        ),
        tier(
            "parent_multi_case",
            "Parent Multi-Case License",
            "For parents handling several related matters",
            Some(29_000),
            Billing::OneTime,
            &[
                "Everything in Single-Case for up to three cases",
                "Cross-case pattern detection",
                "Shared evidence library across cases",
                "Exportable case summaries for your attorney",
                "Priority email support",
            ],
        ),
        tier(
            "small_firm_monthly",
            "Small Firm Monthly Founders",
            "Founder pricing for small family-law practices",
            Some(24_900),
            Billing::Monthly,
            &[
                "Up to 5 attorney or paralegal seats",
                "Unlimited client case workspaces",
                "Court-ready timeline and evidence exports",
                "Founder pricing locked while subscribed",
                "Dedicated onboarding session",
            ],
        ),
        tier(
            "small_firm_annual",
            "Small Firm Annual Founders",
            "A year of firm access at the best founder rate",
            Some(199_900),
            Billing::Annual,
            &[
                "Everything in Small Firm Monthly",
                "Two months free compared to monthly billing",
                "Quarterly strategy call with the founder",
                "Input on the product roadmap",
                "Dedicated onboarding session",
            ],
        ),
    ];

    if let Some(featured) = tiers
        .iter_mut()
        .find(|t| t.id.as_str() == "analyzer_lifetime_founder")
    {
        featured.highlighted = true;
    }

    tiers
}

/// Format US cents as dollars: `4900` -> `$49`, `199900` -> `$1,999`, `2050` -> `$20.50`
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = cents / 100;
    let rest = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rest == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{rest:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founders_prices() {
        let catalog = TierCatalog::founders();
        let price = |id: &str| catalog.get(id).and_then(|t| t.price_cents);

        assert_eq!(price("analyzer_lifetime_founder"), Some(4_900));
        assert_eq!(price("analyzer_annual_founder"), Some(2_000));
        assert_eq!(price("parent_single_case"), Some(16_500));
        assert_eq!(price("parent_multi_case"), Some(29_000));
        assert_eq!(price("small_firm_monthly"), Some(24_900));
        assert_eq!(price("small_firm_annual"), Some(199_900));
        assert_eq!(catalog.paid().count(), 6);
        assert!(catalog.get("supporter").unwrap().is_free());
    }

    #[test]
    fn test_founders_catalog_is_valid() {
        let tiers = TierCatalog::founders().iter().cloned().collect();
        assert!(TierCatalog::new(tiers).is_ok());
    }

    #[test]
    fn test_require_unknown_tier() {
        let catalog = TierCatalog::founders();
        let err = catalog.require("platinum").unwrap_err();
        assert!(matches!(err, PresaleError::InvalidTier(ref t) if t == "platinum"));
        assert_eq!(err.to_string(), "Invalid tier: platinum");
    }

    #[test]
    fn test_rejects_duplicates_and_bad_prices() {
        let a = tier("a", "A", "", Some(100), Billing::OneTime, &[]);
        assert!(TierCatalog::new(vec![a.clone(), a.clone()]).is_err());

        let zero = tier("z", "Z", "", Some(0), Billing::OneTime, &[]);
        assert!(TierCatalog::new(vec![zero]).is_err());

        assert!(TierCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "seat", "label": "Seat", "tagline": "one seat", "price_cents": 1500, "billing": "monthly"},
            {"id": "free", "label": "Free", "tagline": "waitlist", "billing": "one_time"}
        ]"#;
        let catalog = TierCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("seat").unwrap().display_price(), "$15/month");
        assert!(catalog.get("free").unwrap().is_free());
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(4_900), "$49");
        assert_eq!(format_usd(199_900), "$1,999");
        assert_eq!(format_usd(2_050), "$20.50");
        assert_eq!(format_usd(123_456_700), "$1,234,567");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(TierId::new("small_firm_monthly").title_case(), "Small Firm Monthly");
        assert_eq!(
            TierId::new("analyzer_lifetime_founder").title_case(),
            "Analyzer Lifetime Founder"
        );
    }

    #[test]
    fn test_checkout_name() {
        let catalog = TierCatalog::founders();
        assert_eq!(
            catalog.get("parent_single_case").unwrap().checkout_name(),
            "4D LegalTech AI - Parent Single-Case License (Presale Seat)"
        );
    }
}
