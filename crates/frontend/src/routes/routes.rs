use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes, A};
use leptos_router::path;

use crate::domain::a001_emergency::ui::list::EmergencyList;
use crate::domain::a002_dref::ui::form::DrefForm;
use crate::shared::icons::icon;

#[component]
fn Sidebar() -> impl IntoView {
    view! {
        <nav class="sidebar">
            <A href="/emergencies" attr:class="sidebar__item">
                {icon("emergency")}
                <span>"Emergencies"</span>
            </A>
            <A href="/dref/new" attr:class="sidebar__item">
                {icon("dref")}
                <span>"New DREF"</span>
            </A>
        </nav>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <div class="app-shell">
                <Sidebar />
                <main class="app-shell__center">
                    <Routes fallback=|| view! { <div class="empty-state">"Page not found"</div> }>
                        <Route path=path!("/") view=|| view! { <Redirect path="/emergencies" /> } />
                        <Route path=path!("/emergencies") view=|| view! { <EmergencyList /> } />
                        <Route path=path!("/dref/new") view=DrefForm />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
