//! Landing Page

use chrono::{DateTime, TimeZone, Utc};
use leptos::prelude::*;
use presale_core::{TierCatalog, TierId};

use crate::api;
use crate::components::{
    ChatWidget, CountdownTimer, FaqItem, PricingCard, SignupSection, ToastView, Toaster,
};

const DEFAULT_TIER: &str = "analyzer_lifetime_founder";

/// Keep `current` if the catalog has it, else the highlighted tier, else the first
fn default_selection(catalog: &TierCatalog, current: &str) -> String {
    catalog
        .get(current)
        .or_else(|| catalog.iter().find(|t| t.highlighted))
        .or_else(|| catalog.iter().next())
        .map_or_else(|| current.to_string(), |t| t.id.to_string())
}

/// End of the founders presale
fn presale_ends_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or_default()
}

/// Where the visitor lands after hosted checkout
#[derive(Clone, Debug, PartialEq, Eq)]
enum CheckoutReturn {
    Success { tier: Option<String> },
    Canceled,
}

/// Parse `?success=true&tier=...` / `?canceled=true`
fn checkout_return(search: &str) -> Option<CheckoutReturn> {
    let mut success = false;
    let mut canceled = false;
    let mut tier = None;

    for pair in search.trim_start_matches('?').split('&') {
        match pair.split_once('=') {
            Some(("success", "true")) => success = true,
            Some(("canceled", "true")) => canceled = true,
            Some(("tier", value)) if !value.is_empty() => tier = Some(value.to_string()),
            _ => {}
        }
    }

    if success {
        Some(CheckoutReturn::Success { tier })
    } else if canceled {
        Some(CheckoutReturn::Canceled)
    } else {
        None
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let toaster = Toaster::new();
    provide_context(toaster);

    let catalog = RwSignal::new(None::<TierCatalog>);
    let (selected, set_selected) = signal(DEFAULT_TIER.to_string());

    leptos::task::spawn_local(async move {
        match api::list_tiers().await {
            Ok(loaded) => {
                set_selected.update(|current| {
                    let next = default_selection(&loaded, current);
                    *current = next;
                });
                catalog.set(Some(loaded));
            }
            Err(e) => {
                leptos::logging::error!("failed to load tiers: {e}");
                toaster.error("Pricing unavailable", "Please refresh the page or contact us directly.");
            }
        }
    });

    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    match checkout_return(&search) {
        Some(CheckoutReturn::Success { tier }) => {
            let label = tier
                .map(|t| TierId::new(t).title_case())
                .unwrap_or_else(|| "founder".into());
            toaster.success(
                "Payment successful!",
                format!("Welcome aboard, {label}. Your confirmation email is on its way."),
            );
        }
        Some(CheckoutReturn::Canceled) => {
            toaster.error("Checkout canceled", "No payment was taken. You can pick a tier any time.");
        }
        None => {}
    }

    let tiers = move || catalog.with(|c| c.iter().flat_map(TierCatalog::iter).cloned().collect::<Vec<_>>());

    view! {
        <div class="landing">
            <header class="site-header">
                <span class="brand">"4D LegalTech AI"</span>
                <a href="#waitlist" class="btn btn-primary">"Get Early Access"</a>
            </header>

            <section class="hero">
                <h1>"4D LegalTech AI"</h1>
                <p class="subtitle">
                    "AI that surfaces truth and timelines to support family-law outcomes."
                </p>
                <ul class="hero-points">
                    <li>"Analyze messages, documents, and media to reveal patterns"</li>
                    <li>"Auto-generated timelines and event clustering"</li>
                    <li>"Evidence grading with explainable, defensible insights"</li>
                    <li>"Private by design: your data, your control"</li>
                </ul>
                <CountdownTimer target=presale_ends_at() />
                <div class="hero-actions">
                    <a href="#pricing" class="btn btn-primary">"Claim a Founders Seat"</a>
                    <a href="#highlights" class="btn">"See How It Works"</a>
                </div>
            </section>

            <section id="highlights" class="highlights">
                <h2>"What you'll get"</h2>
                <div class="cards">
                    <div class="card">
                        <h3>"Evidence Intelligence"</h3>
                        <p>"Analyze chats, files, and transcripts to reveal key signals"</p>
                    </div>
                    <div class="card">
                        <h3>"Explainable AI"</h3>
                        <p>"Transparent citations and summaries you can trust"</p>
                    </div>
                    <div class="card">
                        <h3>"Case Timeline"</h3>
                        <p>"Auto-built timelines with export-ready views"</p>
                    </div>
                </div>
            </section>

            <section class="how-it-works">
                <h2>"How it works"</h2>
                <ol class="steps">
                    <li><h3>"1. Upload Data"</h3><p>"Securely upload messages, documents, or media files"</p></li>
                    <li><h3>"2. AI Analyzes"</h3><p>"Our AI extracts patterns, events, and evidence markers"</p></li>
                    <li><h3>"3. Get Insights"</h3><p>"Review timelines, evidence grades, and exportable reports"</p></li>
                </ol>
            </section>

            <section id="pricing" class="pricing">
                <h2>"Founders Presale"</h2>
                <p class="subtitle">"Lock in founder pricing before launch"</p>
                <div class="plans">
                    {move || catalog.with(Option::is_none).then(|| view! { <p class="plans-loading">"Loading pricing..."</p> })}
                    {move || {
                        tiers()
                            .into_iter()
                            .map(|tier| view! { <PricingCard tier=tier set_selected=set_selected /> })
                            .collect_view()
                    }}
                </div>
            </section>

            <section class="mission">
                <blockquote>"\"To the moon and back: love's stronger than lies.\""</blockquote>
                <p>
                    "We're building truth-centered technology to reunite families and restore justice. "
                    "4D LegalTech AI brings transparency and clarity to complex family-law situations."
                </p>
            </section>

            <section class="faq">
                <h2>"Frequently Asked Questions"</h2>
                <FaqItem
                    question="What does it cost?"
                    answer="Founders presale seats are listed above. Presale buyers lock in founder pricing and exclusive benefits; the Supporter tier is free."
                />
                <FaqItem
                    question="Is my data private?"
                    answer="We use secure processing with industry-standard encryption. You maintain full control and can delete your data at any time."
                />
                <FaqItem
                    question="When can I start?"
                    answer="Early access invites will roll out soon. Presale buyers and waitlist members are the first to receive an invitation when we launch."
                />
                <FaqItem
                    question="Is this legal advice?"
                    answer="No. 4D LegalTech AI organizes and analyzes your evidence so you can share it with your attorney. It does not replace one."
                />
            </section>

            <section id="waitlist" class="signup">
                <h2>"Be first to access 4D LegalTech AI"</h2>
                <SignupSection catalog=catalog selected=selected set_selected=set_selected />
            </section>

            <footer class="site-footer">
                <nav>
                    <a href="#">"Privacy Policy"</a>
                    <a href="#">"Terms"</a>
                    <a href="mailto:info@lastchanceproject.com">"Contact"</a>
                </nav>
                <p>{format!("© {} 4D LegalTech AI. All rights reserved.", Utc::now().format("%Y"))}</p>
            </footer>

            <ChatWidget />
            <ToastView />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_return() {
        assert_eq!(
            checkout_return("?success=true&tier=parent_single_case"),
            Some(CheckoutReturn::Success {
                tier: Some("parent_single_case".into())
            })
        );
        assert_eq!(checkout_return("?canceled=true"), Some(CheckoutReturn::Canceled));
        assert_eq!(checkout_return(""), None);
        assert_eq!(checkout_return("?utm_source=x"), None);
    }

    #[test]
    fn test_default_selection_follows_served_catalog() {
        let founders = TierCatalog::founders();
        assert_eq!(default_selection(&founders, DEFAULT_TIER), DEFAULT_TIER);
        assert_eq!(default_selection(&founders, "parent_single_case"), "parent_single_case");

        // an operator catalog without the built-in default tier
        let served: Vec<presale_core::Tier> = serde_json::from_str(
            r#"[
                {"id": "community", "label": "Community", "tagline": "Stay informed", "billing": "one_time"},
                {"id": "pro_seat", "label": "Pro Seat", "tagline": "For practitioners",
                 "price_cents": 9900, "billing": "lifetime", "highlighted": true}
            ]"#,
        )
        .unwrap();
        let catalog = TierCatalog::new(served).unwrap();
        assert_eq!(default_selection(&catalog, DEFAULT_TIER), "pro_seat");
    }

    #[test]
    fn test_presale_end_date() {
        assert_eq!(presale_ends_at().format("%Y-%m-%d").to_string(), "2026-12-31");
    }
}
