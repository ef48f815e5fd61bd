use leptos::prelude::*;
use thaw::*;
use uuid::Uuid;

use super::view_model::{parse_optional_number, DrefFormViewModel};
use crate::shared::components::table::format_budget;
use crate::shared::icons::icon;

#[component]
fn FieldError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || message.get().map(|m| view! { <div class="form-group__error">{m}</div> })
}

#[component]
fn InterventionRow(vm: DrefFormViewModel, client_id: Uuid) -> impl IntoView {
    let row = move || {
        vm.form.with(|f| {
            f.planned_interventions
                .iter()
                .find(|row| row.client_id == client_id)
                .cloned()
        })
    };

    view! {
        <div class="intervention-row">
            {move || vm.row_banner(client_id).map(|m| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__text">{m}</span>
                </div>
            })}

            <div class="form-group">
                <label>"Title"</label>
                <input
                    type="text"
                    prop:value=move || row().map(|r| r.title).unwrap_or_default()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        vm.update_row(client_id, |r| r.title = value);
                    }
                />
                <FieldError message=Signal::derive(move || vm.row_error(client_id, "title")) />
            </div>

            <div class="form-group">
                <label>"Budget (CHF)"</label>
                <input
                    type="number"
                    min="0"
                    prop:value=move || {
                        row().and_then(|r| r.budget).map(|b| b.to_string()).unwrap_or_default()
                    }
                    on:input=move |ev| {
                        let value = parse_optional_number(&event_target_value(&ev));
                        vm.update_row(client_id, |r| r.budget = value);
                    }
                />
                <FieldError message=Signal::derive(move || vm.row_error(client_id, "budget")) />
            </div>

            <div class="form-group">
                <label>"Description"</label>
                <textarea
                    rows="2"
                    prop:value=move || row().map(|r| r.description).unwrap_or_default()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        vm.update_row(client_id, |r| r.description = value);
                    }
                />
                <FieldError message=Signal::derive(move || vm.row_error(client_id, "description")) />
            </div>

            <Button
                appearance=ButtonAppearance::Subtle
                on_click=move |_| vm.remove_row(client_id)
            >
                {icon("trash")}
                " Remove"
            </Button>
        </div>
    }
}

/// New DREF application with its planned interventions
#[component]
pub fn DrefForm() -> impl IntoView {
    let vm = DrefFormViewModel::new();

    let total_budget = move || {
        vm.form.with(|f| {
            f.planned_interventions
                .iter()
                .filter_map(|row| row.budget)
                .sum::<i64>()
        })
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("dref")}
                    <h1 class="page__title">"New DREF application"</h1>
                </div>
            </div>

            {move || vm.banner().map(|m| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{m}</span>
                </div>
            })}

            {move || vm.saved.get().map(|created| view! {
                <div class="warning-box warning-box--success">
                    <span class="warning-box__text">
                        {format!("Application \"{}\" saved (#{})", created.title, created.id)}
                    </span>
                </div>
            })}

            <div class="details-form">
                <div class="form-group">
                    <label for="title">"Title"</label>
                    <input
                        type="text"
                        id="title"
                        prop:value=move || vm.form.with(|f| f.title.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            vm.form.update(|f| f.title = value);
                        }
                    />
                    <FieldError message=Signal::derive(move || vm.field_error("title")) />
                </div>

                <div class="form-group">
                    <label for="country">"Country id"</label>
                    <input
                        type="number"
                        id="country"
                        prop:value=move || {
                            vm.form.with(|f| f.country.map(|c| c.to_string()).unwrap_or_default())
                        }
                        on:input=move |ev| {
                            let value = parse_optional_number(&event_target_value(&ev));
                            vm.form.update(|f| f.country = value);
                        }
                    />
                    <FieldError message=Signal::derive(move || vm.field_error("country")) />
                </div>

                <div class="form-group">
                    <label for="num_affected">"People affected"</label>
                    <input
                        type="number"
                        id="num_affected"
                        min="0"
                        prop:value=move || {
                            vm.form.with(|f| f.num_affected.map(|n| n.to_string()).unwrap_or_default())
                        }
                        on:input=move |ev| {
                            let value = parse_optional_number(&event_target_value(&ev));
                            vm.form.update(|f| f.num_affected = value);
                        }
                    />
                    <FieldError message=Signal::derive(move || vm.field_error("num_affected")) />
                </div>

                <h3>"Planned interventions"</h3>
                <For
                    each=move || vm.row_ids()
                    key=|id| *id
                    children=move |client_id| view! { <InterventionRow vm=vm client_id=client_id /> }
                />
                <div class="intervention-total">
                    {move || format!("Total budget: {}", format_budget(Some(total_budget())))}
                </div>

                <Button appearance=ButtonAppearance::Secondary on_click=move |_| vm.add_row()>
                    {icon("plus")}
                    " Add intervention"
                </Button>
            </div>

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command()
                    disabled=Signal::derive(move || vm.is_saving.get())
                >
                    {move || if vm.is_saving.get() { "Saving..." } else { "Submit" }}
                </Button>
            </div>
        </div>
    }
}
