use contracts::shared::list::{ordering_param, ListQuery, Ordering};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::state::{is_filtered, merge_field, reduce, FilterAction, FilterState, FilterStateOptions, Update};
use crate::shared::debounce::{Clock, Debounced};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    /// Raw state changed; fired on every action
    Raw,
    /// Debounced state caught up with the raw state
    Settled,
}

type Listener<F> = Box<dyn FnMut(FilterEvent, &FilterState<F>)>;

/// Owns `{filter, ordering, page}` of one list view.
///
/// Every action updates the raw state at once and restarts the debounce of
/// the whole tuple, so the debounced state only ever holds a state that was
/// raw at some point, never a mix of two.
pub struct FilterStateController<F, C> {
    initial: FilterState<F>,
    raw: FilterState<F>,
    debounced: Debounced<FilterState<F>>,
    page_size: usize,
    clock: C,
    listeners: Vec<(ListenerId, Listener<F>)>,
    next_listener_id: u64,
}

impl<F, C> FilterStateController<F, C>
where
    F: Clone + Serialize,
    C: Clock,
{
    pub fn new(filter: F, options: FilterStateOptions, clock: C) -> Self {
        let initial = FilterState {
            filter,
            ordering: options.ordering,
            page: options.page.max(1),
        };
        Self {
            raw: initial.clone(),
            debounced: Debounced::new(initial.clone(), options.debounce_time_ms),
            initial,
            page_size: options.page_size,
            clock,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn dispatch(&mut self, action: FilterAction<F>) {
        log::debug!("filter state action: {}", action.kind());
        self.raw = reduce(&self.initial, &self.raw, action);
        let now = self.clock.now_ms();
        self.debounced.push(self.raw.clone(), now);
        self.notify(FilterEvent::Raw);
    }

    pub fn set_filter(&mut self, filter: F) {
        self.dispatch(FilterAction::SetFilter(Update::Replace(filter)));
    }

    pub fn update_filter(&mut self, f: impl FnOnce(&F) -> F + 'static) {
        self.dispatch(FilterAction::SetFilter(Update::with(f)));
    }

    pub fn reset_filter(&mut self) {
        self.dispatch(FilterAction::ResetFilter);
    }

    pub fn set_page(&mut self, page: usize) {
        self.dispatch(FilterAction::SetPage(page));
    }

    pub fn set_ordering(&mut self, ordering: Option<Ordering>) {
        self.dispatch(FilterAction::SetOrdering(Update::Replace(ordering)));
    }

    pub fn update_ordering(
        &mut self,
        f: impl FnOnce(&Option<Ordering>) -> Option<Ordering> + 'static,
    ) {
        self.dispatch(FilterAction::SetOrdering(Update::with(f)));
    }

    // ========================================================================
    // Debounce driving
    // ========================================================================

    /// Settles the debounced state if the delay has elapsed
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now_ms();
        let settled = self.debounced.poll(now);
        if settled {
            self.notify(FilterEvent::Settled);
        }
        settled
    }

    /// Settles the debounced state now
    pub fn flush(&mut self) -> bool {
        let settled = self.debounced.flush();
        if settled {
            self.notify(FilterEvent::Settled);
        }
        settled
    }

    pub fn cancel_pending(&mut self) {
        if self.debounced.cancel().is_some() {
            log::debug!("filter state: pending projection cancelled");
        }
    }

    pub fn pending_deadline(&self) -> Option<u64> {
        self.debounced.deadline()
    }

    pub fn debounce_time_ms(&self) -> u64 {
        self.debounced.delay_ms()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Debounced state
    pub fn state(&self) -> &FilterState<F> {
        self.debounced.get()
    }

    pub fn raw_state(&self) -> &FilterState<F> {
        &self.raw
    }

    pub fn initial_state(&self) -> &FilterState<F> {
        &self.initial
    }

    pub fn filter(&self) -> &F {
        &self.state().filter
    }

    pub fn raw_filter(&self) -> &F {
        &self.raw.filter
    }

    pub fn ordering_state(&self) -> Option<&Ordering> {
        self.state().ordering.as_ref()
    }

    pub fn raw_ordering(&self) -> Option<&Ordering> {
        self.raw.ordering.as_ref()
    }

    pub fn page(&self) -> usize {
        self.state().page
    }

    pub fn raw_page(&self) -> usize {
        self.raw.page
    }

    pub fn filtered(&self) -> bool {
        is_filtered(self.filter())
    }

    pub fn raw_filtered(&self) -> bool {
        is_filtered(self.raw_filter())
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        self.state().offset(self.page_size)
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }

    /// `ordering` query parameter of the debounced state
    pub fn ordering(&self) -> Option<String> {
        ordering_param(self.ordering_state())
    }

    pub fn query(&self) -> ListQuery<F> {
        ListQuery {
            filter: self.filter().clone(),
            ordering: self.ordering(),
            offset: self.offset(),
            limit: self.limit(),
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(FilterEvent, &FilterState<F>) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: FilterEvent) {
        let state = match event {
            FilterEvent::Raw => &self.raw,
            FilterEvent::Settled => self.debounced.get(),
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(event, state);
        }
    }
}

impl<F, C> FilterStateController<F, C>
where
    F: Clone + Serialize + DeserializeOwned,
    C: Clock,
{
    /// Sets one field of the filter, keeping the others.
    ///
    /// A filter that is not a struct, or a value of the wrong type for `key`,
    /// leaves the state untouched.
    pub fn set_filter_field<V: Serialize>(&mut self, value: V, key: &str) {
        match merge_field(&self.raw.filter, key, value) {
            Ok(filter) => self.set_filter(filter),
            Err(e) => log::warn!("ignoring filter field `{}`: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::debounce::ManualClock;
    use serde::Deserialize;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Filter {
        #[serde(skip_serializing_if = "Option::is_none")]
        search: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        region: Option<i64>,
    }

    fn controller(clock: &ManualClock) -> FilterStateController<Filter, ManualClock> {
        FilterStateController::new(
            Filter::default(),
            FilterStateOptions::default(),
            clock.clone(),
        )
    }

    fn search(text: &str) -> Filter {
        Filter {
            search: Some(text.to_string()),
            ..Filter::default()
        }
    }

    #[test]
    fn test_defaults() {
        let clock = ManualClock::default();
        let c = controller(&clock);
        assert_eq!(c.page(), 1);
        assert_eq!(c.offset(), 0);
        assert_eq!(c.limit(), 10);
        assert_eq!(c.ordering(), Some("-id".to_string()));
        assert!(!c.filtered());
        assert!(c.pending_deadline().is_none());
    }

    #[test]
    fn test_debounce_coalesces_burst() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        c.subscribe(move |event, state| {
            if event == FilterEvent::Settled {
                sink.borrow_mut().push(state.clone());
            }
        });

        c.set_filter(search("f"));
        clock.advance(50);
        c.set_filter(search("fl"));
        clock.advance(50);
        c.set_page(3);
        clock.advance(50);
        c.set_ordering(Some(Ordering::asc("name")));

        // raw follows every call, debounced has not moved yet
        assert_eq!(c.raw_filter(), &search("fl"));
        assert_eq!(c.raw_page(), 1);
        assert_eq!(c.filter(), &Filter::default());

        clock.advance(199);
        assert!(!c.poll());
        clock.advance(1);
        assert!(c.poll());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].filter, search("fl"));
        assert_eq!(seen[0].ordering, Some(Ordering::asc("name")));
        assert_eq!(seen[0].page, 1);
        assert_eq!(c.ordering(), Some("name".to_string()));
    }

    #[test]
    fn test_page_settles_with_filter() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_page(5);
        c.flush();
        assert_eq!(c.page(), 5);
        assert_eq!(c.offset(), 40);

        c.set_filter(search("cyclone"));
        assert_eq!(c.raw_page(), 1);
        // the old page stays next to the old filter until both settle
        assert_eq!(c.page(), 5);
        assert_eq!(c.filter(), &Filter::default());

        c.flush();
        assert_eq!(c.page(), 1);
        assert_eq!(c.filter(), &search("cyclone"));
    }

    #[test]
    fn test_page_reset_on_every_filter_or_ordering_change() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        for page in [2, 9, 4] {
            c.set_page(page);
            c.update_filter(|prev| Filter {
                region: Some(prev.region.unwrap_or(0) + 1),
                ..prev.clone()
            });
            assert_eq!(c.raw_page(), 1);

            c.set_page(page);
            c.update_ordering(|prev| prev.as_ref().map(Ordering::toggled));
            assert_eq!(c.raw_page(), 1);
        }
        assert_eq!(c.raw_filter().region, Some(3));
    }

    #[test]
    fn test_reset_restores_constructor_values() {
        let clock = ManualClock::default();
        let initial = search("initial");
        let options = FilterStateOptions::default()
            .with_ordering(Some(Ordering::asc("name")))
            .with_page_size(25);
        let mut c = FilterStateController::new(
            initial.clone(),
            FilterStateOptions { page: 2, ..options },
            clock.clone(),
        );

        c.set_filter(search("other"));
        c.set_ordering(None);
        c.set_page(8);
        c.reset_filter();
        c.flush();

        assert_eq!(c.filter(), &initial);
        assert_eq!(c.ordering_state(), Some(&Ordering::asc("name")));
        assert_eq!(c.page(), 2);
        assert_eq!(c.offset(), 25);

        c.reset_filter();
        c.flush();
        assert_eq!(c.state(), c.initial_state());
    }

    #[test]
    fn test_set_filter_field() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_filter(search("flood"));
        c.set_page(3);
        c.set_filter_field(Some(7), "region");

        assert_eq!(c.raw_filter().region, Some(7));
        assert_eq!(c.raw_filter().search.as_deref(), Some("flood"));
        assert_eq!(c.raw_page(), 1);
        assert!(c.raw_filtered());
        assert!(!c.filtered());
    }

    #[test]
    fn test_set_filter_field_wrong_type_is_ignored() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_page(4);
        c.set_filter_field("north", "region");
        assert_eq!(c.raw_filter(), &Filter::default());
        assert_eq!(c.raw_page(), 4);
    }

    #[test]
    fn test_query() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_filter(search("quake"));
        c.flush();
        c.set_page(3);
        c.flush();

        let query = c.query();
        assert_eq!(query.filter, search("quake"));
        assert_eq!(query.ordering.as_deref(), Some("-id"));
        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_offset_of_unbounded_page() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_page(usize::MAX);
        c.flush();
        assert_eq!(c.page(), usize::MAX);
        assert_eq!(c.offset(), usize::MAX);
        assert_eq!(c.query().limit, 10);
    }

    #[test]
    fn test_unordered() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_ordering(None);
        c.flush();
        assert_eq!(c.ordering(), None);
        assert_eq!(c.query().ordering, None);
    }

    #[test]
    fn test_raw_events_and_unsubscribe() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = c.subscribe(move |event, _| {
            if event == FilterEvent::Raw {
                *sink.borrow_mut() += 1;
            }
        });

        c.set_page(2);
        c.set_page(3);
        assert_eq!(*count.borrow(), 2);

        assert!(c.unsubscribe(id));
        assert!(!c.unsubscribe(id));
        c.set_page(4);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_cancel_pending() {
        let clock = ManualClock::default();
        let mut c = controller(&clock);
        c.set_filter(search("storm"));
        assert_eq!(c.pending_deadline(), Some(200));

        c.cancel_pending();
        clock.advance(500);
        assert!(!c.poll());
        assert_eq!(c.filter(), &Filter::default());
    }
}
