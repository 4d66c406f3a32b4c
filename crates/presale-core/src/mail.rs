//! Transactional email
//!
//! The [`Mailer`] trait is the seam to the email provider; the templates
//! here render the waitlist welcome and the purchase confirmation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tier::{Tier, TierId};

/// Sender used when none is configured
pub const DEFAULT_FROM: &str = "4D LegalTech AI <onboarding@resend.dev>";

const CONTACT_EMAIL: &str = "info@lastchanceproject.com";

/// A rendered message ready to hand to a [`Mailer`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Email provider seam
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email; returns the provider's message id
    async fn send(&self, email: OutgoingEmail) -> Result<String>;
}

/// Subject and body of a template, before addressing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

impl EmailContent {
    pub fn addressed(self, from: &str, to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: self.subject,
            html: self.html,
        }
    }
}

/// Welcome email for a waitlist signup
pub fn waitlist_welcome(name: &str, tier: Option<&Tier>) -> EmailContent {
    let (subject, heading) = match tier {
        Some(t) if t.id.as_str() == "supporter" => (
            "Welcome to the Justice Movement - Supporter Tier".to_string(),
            "Thank you for joining the Justice Movement as a <strong>Supporter</strong>!".to_string(),
        ),
        Some(t) => (
            format!("Welcome to the Justice Movement - {}", t.label),
            format!(
                "Thank you for joining the Justice Movement waitlist for <strong>{}</strong>!",
                escape_html(&t.label)
            ),
        ),
        None => (
            "Welcome to the Justice Movement".to_string(),
            "Thank you for joining the Justice Movement waitlist!".to_string(),
        ),
    };

    let benefits = tier
        .map(|t| {
            benefits_block(
                &format!("Your {} Benefits:", escape_html(&t.label)),
                &t.features,
                "background: #F3F4F6; color: inherit;",
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #1E3A8A;">Welcome to 4D LegalTech AI, {name}!</h1>
  <p style="font-size: 16px; line-height: 1.6;">{heading}</p>
  {benefits}
  <p style="font-size: 16px; line-height: 1.6;">Your support helps us build an automated legal platform for parents in family court. Every contribution brings us closer to justice for thousands of parents.</p>
  {quote}
  <p style="font-size: 16px; line-height: 1.6;">We'll keep you updated on our progress and notify you when the platform launches.</p>
  {footer}
</div>"#,
        name = escape_html(name),
        quote = founder_quote("I built this because I lived it. Every feature comes from real court battles."),
        footer = footer(),
    );

    EmailContent { subject, html }
}

/// Confirmation email after a completed presale payment.
///
/// Tiers missing from the catalog still get a confirmation, without a
/// benefits list.
pub fn purchase_confirmation(name: &str, tier_id: &str, tier: Option<&Tier>) -> EmailContent {
    let title = tier
        .map(|t| t.label.clone())
        .unwrap_or_else(|| TierId::new(tier_id).title_case());

    let subject = match tier_id {
        "analyzer_lifetime_founder" => {
            "Welcome Analyzer Lifetime Founder - Your Justice Engine Awaits!".to_string()
        }
        "analyzer_annual_founder" => "Welcome Analyzer Annual Founder - Let's Build Your Case!".to_string(),
        _ => format!("Welcome {title} - Your Presale Seat Is Confirmed!"),
    };

    let benefits = tier
        .map(|t| {
            benefits_block(
                &format!("Your {} Benefits:", escape_html(&title)),
                &t.features,
                "background: linear-gradient(135deg, #1E3A8A 0%, #3B82F6 100%); color: white;",
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #1E3A8A;">Welcome to 4D LegalTech AI, {name}!</h1>
  <p style="font-size: 16px; line-height: 1.6;">Thank you for joining the Justice Movement! Your payment has been confirmed.</p>
  {benefits}
  <div style="background: #F3F4F6; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #1E3A8A; margin-top: 0;">What's Next?</h3>
    <ol style="line-height: 1.8;">
      <li>We're finalizing the platform (launching soon!)</li>
      <li>You'll receive onboarding instructions via email</li>
      <li>Watch for your exclusive access credentials</li>
    </ol>
  </div>
  {quote}
  <p style="font-size: 16px; line-height: 1.6;">Together, we're building the tools to bring justice to thousands of parents.</p>
  {footer}
</div>"#,
        name = escape_html(name),
        quote = founder_quote(
            "I built this because I lived it. Every feature comes from real court battles. Thank you for believing in this mission."
        ),
        footer = footer(),
    );

    EmailContent { subject, html }
}

fn benefits_block(heading: &str, features: &[String], style: &str) -> String {
    if features.is_empty() {
        return String::new();
    }

    let items: String = features
        .iter()
        .map(|f| format!("<li>✅ {}</li>", escape_html(f)))
        .collect();

    format!(
        r#"<div style="{style} padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h2 style="margin-top: 0;">{heading}</h2>
    <ul style="line-height: 1.8;">{items}</ul>
  </div>"#
    )
}

fn founder_quote(text: &str) -> String {
    format!(
        r#"<blockquote style="border-left: 4px solid #3B82F6; padding-left: 20px; margin: 20px 0; font-style: italic; color: #4B5563;">
    "{text}"<br><strong>- Jason Lynn Peppard, Founder</strong>
  </blockquote>"#
    )
}

fn footer() -> String {
    format!(
        r#"<div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #E5E7EB;">
    <p style="color: #6B7280; font-size: 14px;">Questions? Contact Jason at <a href="mailto:{CONTACT_EMAIL}" style="color: #3B82F6;">{CONTACT_EMAIL}</a></p>
  </div>"#
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
