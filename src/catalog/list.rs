use std::time::{
    Duration,
    Instant,
};

use crate::{
    api::types::{
        CharacterStatus,
        ResourceKind,
    },
    core::{
        debounce::Debouncer,
        query::{
            QueryKey,
            QueryParams,
        },
    },
};

/// Filter and pagination state of one list view.
///
/// `name_input` is what the user typed; the name in `params` is the settled value that
/// actually addresses the cache. They differ while the debouncer is armed.
#[derive(Debug)]
pub struct ListState {
    kind: ResourceKind,
    params: QueryParams,
    name_input: String,
    debouncer: Debouncer<String>,
}

impl ListState {
    pub fn new(kind: ResourceKind, debounce: Duration) -> Self {
        Self {
            kind,
            params: QueryParams::default(),
            name_input: String::new(),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn key(&self) -> QueryKey {
        self.params.key(self.kind)
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn set_name_input(&mut self, text: &str, now: Instant) {
        if text == self.name_input {
            return;
        }
        self.name_input = text.to_string();
        self.debouncer.input(self.name_input.clone(), now);
    }

    /// Applies a settled name if the quiet period has passed. Returns whether the key changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(name) => self.replace_params(self.params.clone().with_name(&name)),
            None => false,
        }
    }

    pub fn set_status(&mut self, status: Option<CharacterStatus>) -> bool {
        self.replace_params(self.params.clone().with_status(status))
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        self.replace_params(self.params.clone().with_page(page))
    }

    /// Cancels a pending name emission, e.g. when the view is hidden. The typed text is kept.
    pub fn suspend(&mut self) {
        self.debouncer.cancel();
    }

    /// Re-arms the debouncer if the typed text was never applied.
    pub fn resume(&mut self, now: Instant) {
        let typed = QueryParams::default().with_name(&self.name_input);
        if typed.name() != self.params.name() && !self.debouncer.is_armed() {
            self.debouncer.input(self.name_input.clone(), now);
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn replace_params(&mut self, next: QueryParams) -> bool {
        if next == self.params {
            return false;
        }
        self.params = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_typing_changes_key_only_after_settling() {
        let t0 = Instant::now();
        let mut list = ListState::new(ResourceKind::Character, ms(500));
        list.set_page(4);

        for (i, text) in ["r", "ri", "ric", "rick"].into_iter().enumerate() {
            list.set_name_input(text, t0 + ms(100 * i as u64));
        }
        assert_eq!(list.name_input(), "rick");
        assert!(!list.settle(t0 + ms(700)));
        assert_eq!(list.key().name(), None);
        assert_eq!(list.key().page(), 4);

        assert!(list.settle(t0 + ms(800)));
        assert_eq!(list.key().name(), Some("rick"));
        assert_eq!(list.key().page(), 1);
    }

    #[test]
    fn test_status_change_resets_page() {
        let mut list = ListState::new(ResourceKind::Character, ms(500));
        list.set_page(3);
        assert!(list.set_status(Some(CharacterStatus::Dead)));
        assert_eq!(list.key().page(), 1);
        assert!(!list.set_status(Some(CharacterStatus::Dead)));
    }

    #[test]
    fn test_suspend_and_resume() {
        let t0 = Instant::now();
        let mut list = ListState::new(ResourceKind::Episode, ms(500));

        list.set_name_input("pilot", t0);
        list.suspend();
        assert!(!list.settle(t0 + ms(2_000)));
        assert_eq!(list.name_input(), "pilot");

        list.resume(t0 + ms(3_000));
        assert_eq!(list.deadline(), Some(t0 + ms(3_500)));
        assert!(list.settle(t0 + ms(3_500)));
        assert_eq!(list.key().name(), Some("pilot"));
    }

    #[test]
    fn test_settling_on_same_name_keeps_key() {
        let t0 = Instant::now();
        let mut list = ListState::new(ResourceKind::Episode, ms(500));

        list.set_name_input("a", t0);
        list.set_name_input("", t0 + ms(100));
        assert!(!list.settle(t0 + ms(600)));
        assert_eq!(list.key(), QueryKey::new(ResourceKind::Episode, 1, None, None));
    }
}
