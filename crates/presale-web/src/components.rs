//! UI Components

use std::time::Duration;

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use presale_core::{
    ChatTranscript, Countdown, Role, SelectionAction, SignupForm, Tier, TierCatalog, TierSelection,
};

use crate::api;

// ============================================================================
// Toast
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastMessage {
    pub title: String,
    pub description: String,
    pub error: bool,
}

/// Page-wide toast slot, shared through context
#[derive(Clone, Copy)]
pub struct Toaster(RwSignal<Option<ToastMessage>>);

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self(RwSignal::new(None))
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.show(title.into(), description.into(), false);
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.show(title.into(), description.into(), true);
    }

    fn show(&self, title: String, description: String, error: bool) {
        let slot = self.0;
        let message = ToastMessage {
            title,
            description,
            error,
        };
        slot.set(Some(message.clone()));

        // only dismiss the toast this call put up
        set_timeout(
            move || {
                if slot.get_untracked().as_ref() == Some(&message) {
                    slot.set(None);
                }
            },
            Duration::from_secs(5),
        );
    }

    fn dismiss(&self) {
        self.0.set(None);
    }

    fn current(&self) -> Option<ToastMessage> {
        self.0.get()
    }
}

fn toaster() -> Toaster {
    use_context::<Toaster>().unwrap_or_else(Toaster::new)
}

#[component]
pub fn ToastView() -> impl IntoView {
    let toaster = toaster();

    move || {
        toaster.current().map(|toast| {
            let class = if toast.error { "toast toast-error" } else { "toast" };
            view! {
                <div class=class role="status" on:click=move |_| toaster.dismiss()>
                    <strong>{toast.title}</strong>
                    <p>{toast.description}</p>
                </div>
            }
        })
    }
}

// ============================================================================
// Countdown
// ============================================================================

/// Ticks once per second until `target`; the interval stops on unmount
#[component]
pub fn CountdownTimer(target: DateTime<Utc>) -> impl IntoView {
    let (remaining, set_remaining) = signal(Countdown::between(target, Utc::now()));

    if let Ok(handle) = set_interval_with_handle(
        move || set_remaining.set(Countdown::between(target, Utc::now())),
        Duration::from_secs(1),
    ) {
        on_cleanup(move || handle.clear());
    }

    let unit = move |label: &'static str, value: fn(&Countdown) -> i64| {
        view! {
            <div class="countdown-unit">
                <span class="countdown-value">{move || format!("{:02}", value(&remaining.get()))}</span>
                <span class="countdown-label">{label}</span>
            </div>
        }
    };

    view! {
        <div class="countdown">
            <Show
                when=move || !remaining.get().is_expired()
                fallback=|| view! { <p class="countdown-ended">"The founders presale has ended."</p> }
            >
                <p class="countdown-title">"Founders presale ends in"</p>
                <div class="countdown-units">
                    {unit("Days", |c| c.days)}
                    {unit("Hours", |c| c.hours)}
                    {unit("Minutes", |c| c.minutes)}
                    {unit("Seconds", |c| c.seconds)}
                </div>
            </Show>
        </div>
    }
}

// ============================================================================
// FAQ
// ============================================================================

/// FAQ accordion item
#[component]
pub fn FaqItem(question: &'static str, answer: &'static str) -> impl IntoView {
    let (is_open, set_is_open) = signal(false);

    view! {
        <div class="faq-item">
            <button
                class="faq-question"
                on:click=move |_| set_is_open.update(|v| *v = !*v)
                aria-expanded=move || is_open.get().to_string()
            >
                <span>{question}</span>
                <span class="faq-chevron" class:open=move || is_open.get()>"⌄"</span>
            </button>
            <div class="faq-answer" class:collapsed=move || !is_open.get()>
                <p>{answer}</p>
            </div>
        </div>
    }
}

// ============================================================================
// Pricing
// ============================================================================

/// One tier card; choosing it preselects the tier in the signup form
#[component]
pub fn PricingCard(tier: Tier, set_selected: WriteSignal<String>) -> impl IntoView {
    let id = tier.id.to_string();
    let class = if tier.highlighted { "plan featured" } else { "plan" };
    let cta = if tier.is_free() { "Join the Waitlist" } else { "Reserve My Seat" };

    view! {
        <div class=class>
            {tier.highlighted.then(|| view! { <span class="badge">"Most Popular"</span> })}
            <h3>{tier.label.clone()}</h3>
            <p class="tagline">{tier.tagline.clone()}</p>
            <div class="price">{tier.display_price()}</div>
            <ul>
                {tier.features.iter().map(|f| view! { <li>{f.clone()}</li> }).collect_view()}
            </ul>
            <a href="#waitlist" class="btn" on:click=move |_| set_selected.set(id.clone())>
                {cta}
            </a>
        </div>
    }
}

// ============================================================================
// Signup
// ============================================================================

const WAITLIST_SUBMITTED_KEY: &str = "waitlist_submitted";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn is_submitted_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Whether this browser already joined the waitlist
fn waitlist_submitted() -> bool {
    let stored = local_storage().and_then(|s| s.get_item(WAITLIST_SUBMITTED_KEY).ok().flatten());
    is_submitted_flag(stored.as_deref())
}

fn remember_waitlist_submitted() {
    let saved = local_storage().is_some_and(|s| s.set_item(WAITLIST_SUBMITTED_KEY, "true").is_ok());
    if !saved {
        leptos::logging::warn!("could not persist waitlist state");
    }
}

/// Hand the browser a new location; `navigate` yields `None` without a window
fn redirect_with<E: std::fmt::Debug>(
    url: &str,
    navigate: impl FnOnce(&str) -> Option<Result<(), E>>,
) -> Result<(), String> {
    match navigate(url) {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(format!("redirect to {url} failed: {e:?}")),
        None => Err("no browser window".into()),
    }
}

fn redirect(url: &str) -> Result<(), String> {
    redirect_with(url, |url| web_sys::window().map(|w| w.location().set_href(url)))
}

/// Name/email form with tier selection.
///
/// Free tiers join the waitlist; paid tiers redirect to hosted checkout.
/// Submitting is refused until the catalog has loaded.
#[component]
pub fn SignupSection(
    catalog: RwSignal<Option<TierCatalog>>,
    selected: ReadSignal<String>,
    set_selected: WriteSignal<String>,
) -> impl IntoView {
    let toaster = toaster();
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (field_error, set_field_error) = signal(None::<String>);
    let (submitting, set_submitting) = signal(false);
    let (joined, set_joined) = signal(waitlist_submitted());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_field_error.set(None);

        let form = SignupForm::new(name.get_untracked(), email.get_untracked());
        let tier = selected.get_untracked();
        let planned = catalog.with_untracked(|c| c.as_ref().map(|c| TierSelection::plan(c, &tier, &form)));

        let action = match planned {
            Some(Ok(action)) => action,
            None => {
                generic_failure(toaster);
                return;
            }
            Some(Err(e)) => {
                set_field_error.set(Some(e.user_message()));
                toaster.error("Please check the form", e.user_message());
                return;
            }
        };

        set_submitting.set(true);
        leptos::task::spawn_local(async move {
            match action {
                SelectionAction::JoinWaitlist(request) => match api::join_waitlist(&request).await {
                    Ok(()) => {
                        remember_waitlist_submitted();
                        set_joined.set(true);
                        toaster.success(
                            "You're on the list!",
                            "Check your inbox for a welcome email from the Justice Movement.",
                        );
                    }
                    Err(_) => generic_failure(toaster),
                },
                SelectionAction::StartCheckout(request) => match api::create_checkout(&request).await {
                    Ok(session) => {
                        if let Err(e) = redirect(&session.url) {
                            leptos::logging::error!("{e}");
                            generic_failure(toaster);
                        }
                    }
                    Err(_) => generic_failure(toaster),
                },
            }
            set_submitting.set(false);
        });
    };

    let button_label = move || {
        let id = selected.get();
        let free = catalog.with(|c| c.as_ref().and_then(|c| c.get(&id)).is_none_or(Tier::is_free));
        match (submitting.get(), free) {
            (true, _) => "Processing...",
            (false, true) => "Join the Waitlist",
            (false, false) => "Continue to Payment",
        }
    };

    view! {
        <Show
            when=move || !joined.get()
            fallback=|| view! {
                <div class="signup-done">
                    <h3>"You're on the list!"</h3>
                    <p>"We'll be in touch soon with early access details."</p>
                </div>
            }
        >
            <form class="signup-form" on:submit=submit>
                <label for="name">"Name"</label>
                <input
                    id="name"
                    type="text"
                    placeholder="Your name"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />

                <label for="email">"Email"</label>
                <input
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />

                <label for="tier">"Tier"</label>
                <select id="tier" on:change=move |ev| set_selected.set(event_target_value(&ev))>
                    {tier_options(catalog, selected)}
                </select>

                {move || field_error.get().map(|msg| view! { <p class="field-error">{msg}</p> })}

                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {button_label}
                </button>
                <p class="fine-print">"We'll only use your email to send presale updates. No spam."</p>
            </form>
        </Show>
    }
}

fn tier_options(catalog: RwSignal<Option<TierCatalog>>, selected: ReadSignal<String>) -> impl IntoView {
    move || {
        catalog.with(|c| {
            c.iter()
                .flat_map(TierCatalog::iter)
                .map(|t| {
                    let id = t.id.to_string();
                    let label = format!("{} - {}", t.label, t.display_price());
                    view! { <option value=id.clone() selected=move || selected.get() == id>{label}</option> }
                })
                .collect_view()
        })
    }
}

fn generic_failure(toaster: Toaster) {
    toaster.error("Something went wrong", "Please try again or contact us directly.");
}

// ============================================================================
// Chat widget
// ============================================================================

/// Floating support chat; the transcript lives only in memory
#[component]
pub fn ChatWidget() -> impl IntoView {
    let toaster = toaster();
    let transcript = RwSignal::new(ChatTranscript::new());
    let (open, set_open) = signal(false);
    let (input, set_input) = signal(String::new());

    let send = move || {
        let text = input.get_untracked();
        let mut outbound = None;
        transcript.update(|t| outbound = t.begin(&text));
        let Some(outbound) = outbound else {
            return;
        };
        set_input.set(String::new());

        leptos::task::spawn_local(async move {
            match api::send_chat(&outbound).await {
                Ok(reply) => transcript.update(|t| t.resolve(reply)),
                Err(_) => {
                    transcript.update(ChatTranscript::reject);
                    toaster.error("Error", "Failed to get response. Please try again.");
                }
            }
        });
    };

    let pending = move || transcript.with(ChatTranscript::is_pending);

    view! {
        <div class="chat-widget">
            <Show
                when=move || open.get()
                fallback=move || view! {
                    <button class="chat-launcher" on:click=move |_| set_open.set(true)>"Chat with us"</button>
                }
            >
                <div class="chat-panel">
                    <header class="chat-header">
                        <span>"4D LegalTech AI Support"</span>
                        <button class="chat-close" on:click=move |_| set_open.set(false)>"×"</button>
                    </header>

                    <div class="messages">
                        <For
                            each=move || transcript.with(|t| t.messages().iter().cloned().enumerate().collect::<Vec<_>>())
                            key=|(i, _)| *i
                            children=move |(_, msg)| {
                                let class = match msg.role {
                                    Role::User => "message message-user",
                                    _ => "message message-assistant",
                                };
                                view! { <div class=class><p class="content">{msg.content}</p></div> }
                            }
                        />
                        <Show when=pending>
                            <div class="message loading">"..."</div>
                        </Show>
                    </div>

                    <div class="input-area">
                        <input
                            type="text"
                            placeholder="Ask about features or pricing..."
                            prop:value=move || input.get()
                            on:input=move |ev| set_input.set(event_target_value(&ev))
                            on:keydown=move |ev| {
                                if ev.key() == "Enter" && !ev.shift_key() {
                                    ev.prevent_default();
                                    send();
                                }
                            }
                        />
                        <button on:click=move |_| send() disabled=pending>
                            {move || if pending() { "..." } else { "Send" }}
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
