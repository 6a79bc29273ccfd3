mod change_password;
mod dashboard;
mod health;
mod login;
mod not_found;
mod profile;
mod unlock;

pub(crate) use change_password::ChangePasswordPage;
pub(crate) use dashboard::DashboardPage;
pub(crate) use health::HealthPage;
pub(crate) use login::LoginPage;
pub(crate) use not_found::NotFoundPage;
pub(crate) use profile::ProfilePage;
pub(crate) use unlock::{UnlockDirectPage, UnlockTokenPage};

use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

/// Route constants shared by navigation calls.
pub(crate) mod paths {
    pub const LOGIN: &str = "/login";
    pub const DASHBOARD: &str = "/dashboard";
    pub const UNLOCK: &str = "/unlock";
    pub const LOGIN_AFTER_PASSWORD_CHANGE: &str = "/login?password_changed=true";
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=DashboardPage />
            <Route path=path!("/dashboard") view=DashboardPage />
            <Route path=path!("/login") view=LoginPage />
            <Route path=path!("/change-password") view=ChangePasswordPage />
            <Route path=path!("/profile") view=ProfilePage />
            <Route path=path!("/unlock") view=UnlockDirectPage />
            <Route path=path!("/unlock/:token") view=UnlockTokenPage />
            <Route path=path!("/health") view=HealthPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
