use contracts::shared::list::{ordering_param, ListQuery, Ordering};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::controller::FilterStateController;
use super::state::{is_filtered, FilterState, FilterStateOptions};
use crate::shared::debounce::{BrowserClock, BrowserScheduler, Clock, Scheduler};

/// Sorting as seen by a sortable table: current column plus a setter
#[derive(Clone, Copy)]
pub struct SortState {
    pub sorting: Signal<Option<Ordering>>,
    pub set_sorting: Callback<Option<Ordering>>,
}

/// Reactive handle returned by [`use_filter_state`].
///
/// Reads are tracked, so calling `filter()` or `query()` inside an effect or
/// a view re-runs it when the debounced state settles. `raw_*` reads follow
/// every keystroke and are meant for echoing controlled inputs.
pub struct FilterStateHandle<
    F: 'static,
    C: 'static = BrowserClock,
    S: Scheduler + 'static = BrowserScheduler,
> {
    controller: StoredValue<FilterStateController<F, C>, LocalStorage>,
    raw: RwSignal<FilterState<F>>,
    debounced: RwSignal<FilterState<F>>,
    scheduler: StoredValue<S, LocalStorage>,
    timer: StoredValue<Option<S::Handle>, LocalStorage>,
    page_size: usize,
}

impl<F: 'static, C: 'static, S: Scheduler + 'static> Clone for FilterStateHandle<F, C, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: 'static, C: 'static, S: Scheduler + 'static> Copy for FilterStateHandle<F, C, S> {}

/// Creates the filter state of a list view owned by the current reactive
/// owner. A pending debounce is cancelled when the owner is cleaned up.
pub fn use_filter_state<F>(filter: F, options: FilterStateOptions) -> FilterStateHandle<F>
where
    F: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    use_filter_state_with(filter, options, BrowserClock, BrowserScheduler)
}

/// [`use_filter_state`] with its own time source and timers
pub fn use_filter_state_with<F, C, S>(
    filter: F,
    options: FilterStateOptions,
    clock: C,
    scheduler: S,
) -> FilterStateHandle<F, C, S>
where
    F: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static,
    C: Clock + 'static,
    S: Scheduler + 'static,
{
    let page_size = options.page_size;
    let controller = FilterStateController::new(filter, options, clock);
    let handle = FilterStateHandle {
        raw: RwSignal::new(controller.raw_state().clone()),
        debounced: RwSignal::new(controller.state().clone()),
        controller: StoredValue::new_local(controller),
        scheduler: StoredValue::new_local(scheduler),
        timer: StoredValue::new_local(None),
        page_size,
    };
    on_cleanup(move || handle.teardown());
    handle
}

impl<F, C, S> FilterStateHandle<F, C, S>
where
    F: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static,
    C: Clock + 'static,
    S: Scheduler + 'static,
{
    // ========================================================================
    // Actions
    // ========================================================================

    pub fn set_filter(&self, filter: F) {
        self.apply(move |c| c.set_filter(filter));
    }

    pub fn update_filter(&self, f: impl FnOnce(&F) -> F + 'static) {
        self.apply(move |c| c.update_filter(f));
    }

    pub fn set_filter_field<V: Serialize>(&self, value: V, key: &str) {
        self.apply(move |c| c.set_filter_field(value, key));
    }

    pub fn reset_filter(&self) {
        self.apply(|c| c.reset_filter());
    }

    pub fn set_page(&self, page: usize) {
        self.apply(move |c| c.set_page(page));
    }

    pub fn set_ordering(&self, ordering: Option<Ordering>) {
        self.apply(move |c| c.set_ordering(ordering));
    }

    pub fn update_ordering(
        &self,
        f: impl FnOnce(&Option<Ordering>) -> Option<Ordering> + 'static,
    ) {
        self.apply(move |c| c.update_ordering(f));
    }

    /// `on_change` callback for the form field bound to `key`
    pub fn field_setter<V>(&self, key: &'static str) -> Callback<V>
    where
        V: Serialize + 'static,
    {
        let handle = *self;
        Callback::new(move |value: V| handle.set_filter_field(value, key))
    }

    pub fn sort_state(&self) -> SortState {
        let handle = *self;
        SortState {
            sorting: Signal::derive(move || handle.raw.with(|s| s.ordering.clone())),
            set_sorting: Callback::new(move |ordering| handle.set_ordering(ordering)),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn filter(&self) -> F {
        self.debounced.with(|s| s.filter.clone())
    }

    pub fn raw_filter(&self) -> F {
        self.raw.with(|s| s.filter.clone())
    }

    pub fn ordering_state(&self) -> Option<Ordering> {
        self.debounced.with(|s| s.ordering.clone())
    }

    pub fn raw_ordering(&self) -> Option<Ordering> {
        self.raw.with(|s| s.ordering.clone())
    }

    /// `ordering` query parameter of the debounced state
    pub fn ordering(&self) -> Option<String> {
        self.debounced.with(|s| ordering_param(s.ordering.as_ref()))
    }

    pub fn page(&self) -> usize {
        self.debounced.with(|s| s.page)
    }

    pub fn filtered(&self) -> bool {
        self.debounced.with(|s| is_filtered(&s.filter))
    }

    pub fn raw_filtered(&self) -> bool {
        self.raw.with(|s| is_filtered(&s.filter))
    }

    pub fn offset(&self) -> usize {
        self.debounced.with(|s| s.offset(self.page_size))
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }

    pub fn query(&self) -> ListQuery<F> {
        self.debounced.with(|s| ListQuery {
            filter: s.filter.clone(),
            ordering: ordering_param(s.ordering.as_ref()),
            offset: s.offset(self.page_size),
            limit: self.page_size,
        })
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn apply(&self, action: impl FnOnce(&mut FilterStateController<F, C>)) {
        let mut echo = None;
        self.controller.update_value(|c| {
            action(c);
            echo = Some((c.raw_state().clone(), c.debounce_time_ms()));
        });
        let Some((raw, delay_ms)) = echo else {
            return;
        };
        self.raw.set(raw);
        self.schedule(delay_ms);
    }

    fn schedule(&self, delay_ms: u64) {
        let handle = *self;
        let timer = self.scheduler.try_with_value(|s| {
            s.schedule(
                delay_ms,
                Box::new(move || {
                    handle.settle();
                }),
            )
        });
        // dropping the previous timer cancels it
        if let Some(timer) = timer {
            self.timer.set_value(Some(timer));
        }
    }

    /// Publishes the settled state; returns `false` when nothing changed
    fn settle(&self) -> bool {
        let settled = self
            .controller
            .try_update_value(|c| c.flush().then(|| c.state().clone()))
            .flatten();
        let Some(state) = settled else {
            return false;
        };
        let changed = self
            .debounced
            .try_with_untracked(|current| *current != state)
            .unwrap_or(false);
        if changed {
            let _ = self.debounced.try_set(state);
        }
        changed
    }

    fn teardown(&self) {
        if let Some(Some(timer)) = self.timer.try_update_value(Option::take) {
            drop(timer);
        }
        self.controller.try_update_value(|c| c.cancel_pending());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::debounce::{ManualClock, ManualScheduler};
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Filter {
        #[serde(skip_serializing_if = "Option::is_none")]
        search: Option<String>,
    }

    fn handle(
        scheduler: &ManualScheduler,
    ) -> FilterStateHandle<Filter, ManualClock, ManualScheduler> {
        use_filter_state_with(
            Filter::default(),
            FilterStateOptions::default(),
            ManualClock::default(),
            scheduler.clone(),
        )
    }

    #[test]
    fn test_raw_echo_before_settle() {
        let owner = Owner::new();
        owner.with(|| {
            let scheduler = ManualScheduler::default();
            let state = handle(&scheduler);

            state.set_filter_field(Some("flood"), "search");
            state.set_page(2);

            assert_eq!(state.raw_filter().search.as_deref(), Some("flood"));
            assert!(state.raw_filtered());
            assert_eq!(state.filter(), Filter::default());
            assert_eq!(state.page(), 1);
            // the second action replaced the first timer
            assert_eq!(scheduler.pending(), 1);

            assert_eq!(scheduler.run_pending(), 1);
            assert_eq!(state.filter().search.as_deref(), Some("flood"));
            assert_eq!(state.page(), 2);
            assert_eq!(state.query().offset, 10);
            assert!(state.filtered());
        });
    }

    #[test]
    fn test_unchanged_state_is_not_republished() {
        let owner = Owner::new();
        owner.with(|| {
            let scheduler = ManualScheduler::default();
            let state = handle(&scheduler);

            state.set_page(1);
            assert!(!state.settle());

            state.reset_filter();
            assert!(!state.settle());

            state.set_page(3);
            assert!(state.settle());
            assert_eq!(state.page(), 3);
        });
    }

    #[test]
    fn test_cleanup_cancels_pending_timer() {
        let owner = Owner::new();
        let scheduler = ManualScheduler::default();
        let state = owner.with(|| handle(&scheduler));

        owner.with(|| state.set_filter_field(Some("storm"), "search"));
        assert_eq!(scheduler.pending(), 1);

        owner.cleanup();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.run_pending(), 0);
    }
}
