//! Transient toast notifications layered over route content. Failures show
//! both an inline alert near the control and a toast here; validation
//! errors stay inline-only, so callers decide what to push.

use crate::components::ui::alert::AlertKind;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Milliseconds a toast stays visible.
const TOAST_TTL_MS: u32 = 4_000;

#[derive(Clone)]
pub struct Toast {
    id: u64,
    kind: AlertKind,
    message: String,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl ToastContext {
    fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn push(self, kind: AlertKind, message: impl Into<String>) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.into(),
            });
        });

        let toasts = self.toasts;
        Timeout::new(TOAST_TTL_MS, move || {
            toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
        })
        .forget();
    }

    pub fn error(self, message: impl Into<String>) {
        self.push(AlertKind::Error, message);
    }

    pub fn success(self, message: impl Into<String>) {
        self.push(AlertKind::Success, message);
    }

    pub fn info(self, message: impl Into<String>) {
        self.push(AlertKind::Info, message);
    }
}

/// Provides the toast context and renders the stacked notifications.
#[component]
pub fn ToastHost(children: Children) -> impl IntoView {
    let context = ToastContext::new();
    provide_context(context);

    view! {
        {children()}
        <div class="fixed top-4 right-4 z-50 flex flex-col gap-2 w-80 max-w-[90vw]">
            <For
                each=move || context.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let class = match toast.kind {
                        AlertKind::Error => {
                            "rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700 shadow-lg dark:border-red-400 dark:bg-red-900/80 dark:text-red-100"
                        }
                        AlertKind::Success => {
                            "rounded-lg border border-emerald-200 bg-emerald-50 px-4 py-3 text-sm text-emerald-700 shadow-lg dark:border-emerald-400 dark:bg-emerald-900/80 dark:text-emerald-100"
                        }
                        AlertKind::Info | AlertKind::Warning => {
                            "rounded-lg border border-blue-200 bg-blue-50 px-4 py-3 text-sm text-blue-700 shadow-lg dark:border-blue-400 dark:bg-blue-900/80 dark:text-blue-100"
                        }
                    };
                    view! { <div class=class role="status">{toast.message}</div> }
                }
            />
        </div>
    }
}

/// Returns the toast context or a detached fallback for bare components.
pub fn use_toasts() -> ToastContext {
    use_context::<ToastContext>().unwrap_or_else(ToastContext::new)
}
