use chrono::{NaiveDate, Utc};
use contracts::domain::a001_emergency::dto::{EmergencyDto, EmergencyFilter};
use contracts::shared::list::{ListResponse, Ordering};
use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_emergency::api::fetch_emergencies;
use crate::shared::components::filter_panel::FilterPanel;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table::{format_optional_count, SortableHeaderCell};
use crate::shared::filter_state::{use_filter_state, FilterStateOptions};
use crate::shared::icons::icon;
use crate::shared::list_utils::SearchInput;

/// Disaster types offered in the filter
const DISASTER_TYPES: &[(i64, &str)] = &[
    (1, "Epidemic"),
    (2, "Earthquake"),
    (4, "Cyclone"),
    (12, "Flood"),
    (20, "Drought"),
];

pub fn list_options() -> FilterStateOptions {
    FilterStateOptions::default()
        .with_ordering(Some(Ordering::dsc("disaster_start_date")))
        .with_page_size(20)
}

/// Empty text clears the field
fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Value of an `<input type="date">`
fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[component]
fn EmergencyListHeader(
    #[prop(into)] total_count: Signal<usize>,
    #[prop(into)] is_loading: Signal<bool>,
    on_refresh: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-left">
                {icon("emergency")}
                <h1 class="page__title">"Emergencies"</h1>
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                    <span>{move || total_count.get().to_string()}</span>
                </Badge>
            </div>

            <div class="page__header-right">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_refresh.run(())
                    disabled=is_loading
                >
                    {icon("refresh")}
                    {move || if is_loading.get() { " Loading..." } else { " Refresh" }}
                </Button>
            </div>
        </div>
    }
}

#[component]
fn EmergencyRow(emergency: EmergencyDto) -> impl IntoView {
    let start_date = emergency
        .disaster_start_date
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_default();
    let disaster_type = emergency
        .dtype
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_default();
    let countries = emergency.country_names();

    view! {
        <TableRow>
            <TableCell>{start_date}</TableCell>
            <TableCell>{emergency.name}</TableCell>
            <TableCell>{disaster_type}</TableCell>
            <TableCell>{countries}</TableCell>
            <TableCell attr:style="text-align: right;">
                {format_optional_count(emergency.num_affected)}
            </TableCell>
        </TableRow>
    }
}

/// Emergencies that started in the last thirty days, newest first
#[component]
pub fn EmergencyList(
    /// Day the "recent" window counts back from; today when not set
    #[prop(optional)]
    today: Option<NaiveDate>,
) -> impl IntoView {
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let state = use_filter_state(EmergencyFilter::recent(today), list_options());
    let sort_state = state.sort_state();

    let (response, set_response) = signal(ListResponse::<EmergencyDto>::default());
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let (reload, set_reload) = signal(0_u32);
    let is_expanded = RwSignal::new(true);

    // Responses of superseded requests are ignored
    let latest_request = StoredValue::new(0_u64);

    Effect::new(move |_| {
        reload.track();
        let query = state.query();
        latest_request.update_value(|id| *id += 1);
        let request_id = latest_request.get_value();

        set_is_loading.set(true);
        set_error.set(None);
        leptos::task::spawn_local(async move {
            let result = fetch_emergencies(&query).await;
            if latest_request.get_value() != request_id {
                log::debug!("emergency list: dropping stale response {}", request_id);
                return;
            }
            match result {
                Ok(page) => set_response.set(page),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_is_loading.set(false);
        });
    });

    let search = Signal::derive(move || state.raw_filter().search.unwrap_or_default());
    let on_search = Callback::new(move |text: String| {
        state.set_filter_field(non_empty(text), "search");
    });
    let on_disaster_type = state.field_setter::<Option<i64>>("disaster_type");
    let on_country = state.field_setter::<Option<i64>>("countries_in");
    let on_start_date = state.field_setter::<Option<NaiveDate>>("start_date_after");

    view! {
        <div class="page page--wide">
            <EmergencyListHeader
                total_count=Signal::derive(move || response.with(|r| r.count))
                is_loading=is_loading
                on_refresh=Callback::new(move |_| set_reload.update(|n| *n += 1))
            />

            {move || error.get().map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <FilterPanel
                is_expanded=is_expanded
                is_filtered=Signal::derive(move || state.raw_filtered())
                on_clear=Callback::new(move |_| state.reset_filter())
                header_center=move || view! {
                    <PaginationControls
                        page=Signal::derive(move || state.page())
                        count=Signal::derive(move || response.with(|r| r.count))
                        page_size=state.limit()
                        on_page_change=Callback::new(move |page| state.set_page(page))
                    />
                }
            >
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Search:"</Label>
                        <SearchInput value=search on_change=on_search placeholder="Name or GLIDE number" />
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Disaster type:"</Label>
                        <select
                            class="filter-select"
                            prop:value=move || {
                                state
                                    .raw_filter()
                                    .disaster_type
                                    .map(|id| id.to_string())
                                    .unwrap_or_default()
                            }
                            on:change=move |ev| {
                                on_disaster_type.run(event_target_value(&ev).parse::<i64>().ok());
                            }
                        >
                            <option value="">"All types"</option>
                            {DISASTER_TYPES
                                .iter()
                                .map(|(id, name)| view! { <option value=id.to_string()>{*name}</option> })
                                .collect_view()}
                        </select>
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Country id:"</Label>
                        <input
                            type="number"
                            class="filter-number"
                            prop:value=move || {
                                state
                                    .raw_filter()
                                    .countries_in
                                    .map(|id| id.to_string())
                                    .unwrap_or_default()
                            }
                            on:change=move |ev| {
                                on_country.run(event_target_value(&ev).trim().parse::<i64>().ok());
                            }
                        />
                    </Flex>

                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Started after:"</Label>
                        <input
                            type="date"
                            prop:value=move || {
                                state
                                    .raw_filter()
                                    .start_date_after
                                    .map(|d| d.format("%Y-%m-%d").to_string())
                                    .unwrap_or_default()
                            }
                            on:change=move |ev| {
                                on_start_date.run(parse_date_input(&event_target_value(&ev)));
                            }
                        />
                    </Flex>
                </Flex>
            </FilterPanel>

            <div class="page-content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <SortableHeaderCell label="Start date" field="disaster_start_date" sort_state=sort_state min_width=120.0 />
                            <SortableHeaderCell label="Name" field="name" sort_state=sort_state min_width=280.0 />
                            <TableHeaderCell min_width=120.0>"Disaster type"</TableHeaderCell>
                            <TableHeaderCell min_width=200.0>"Countries"</TableHeaderCell>
                            <SortableHeaderCell label="People affected" field="num_affected" sort_state=sort_state align="right" />
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || response.get().results
                            key=|e| e.id
                            children=move |emergency| view! { <EmergencyRow emergency=emergency /> }
                        />
                    </TableBody>
                </Table>

                <Show when=move || !is_loading.get() && response.with(|r| r.results.is_empty())>
                    <div class="empty-state">
                        {move || if state.filtered() {
                            "No emergencies match the filters"
                        } else {
                            "No emergencies"
                        }}
                    </div>
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options() {
        let options = list_options();
        assert_eq!(options.ordering, Some(Ordering::dsc("disaster_start_date")));
        assert_eq!(options.page_size, 20);
        assert_eq!(options.debounce_time_ms, 200);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("flood".to_string()), Some("flood".to_string()));
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("2024-02-14"), NaiveDate::from_ymd_opt(2024, 2, 14));
        assert_eq!(parse_date_input(""), None);
    }
}
