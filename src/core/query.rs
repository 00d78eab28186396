use crate::api::types::{
    CharacterStatus,
    ResourceKind,
};

/// Cache key for one collection page: resource kind plus normalized parameters.
///
/// Search text is trimmed and an empty string is stored as absent, so `""`, `"  "` and no
/// filter at all address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    kind: ResourceKind,
    page: u32,
    name: Option<String>,
    status: Option<CharacterStatus>,
}

impl QueryKey {
    pub fn new(
        kind: ResourceKind,
        page: u32,
        name: Option<&str>,
        status: Option<CharacterStatus>,
    ) -> Self {
        Self { kind, page, name: normalize_text(name), status }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn status(&self) -> Option<CharacterStatus> {
        self.status
    }
}

fn normalize_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// The parameter tuple a list view is currently showing.
///
/// Changing a filter always moves back to page 1; only an explicit page change keeps the
/// filters and moves the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    page: u32,
    name: Option<String>,
    status: Option<CharacterStatus>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self { page: 1, name: None, status: None }
    }
}

impl QueryParams {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn status(&self) -> Option<CharacterStatus> {
        self.status
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        let name = normalize_text(Some(name));
        if name != self.name {
            self.name = name;
            self.page = 1;
        }
        self
    }

    pub fn with_status(mut self, status: Option<CharacterStatus>) -> Self {
        if status != self.status {
            self.status = status;
            self.page = 1;
        }
        self
    }

    pub fn key(&self, kind: ResourceKind) -> QueryKey {
        QueryKey { kind, page: self.page, name: self.name.clone(), status: self.status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_names_are_equal_keys() {
        let a = QueryKey::new(ResourceKind::Character, 1, Some(""), None);
        let b = QueryKey::new(ResourceKind::Character, 1, Some("   "), None);
        let c = QueryKey::new(ResourceKind::Character, 1, None, None);
        assert_eq!(a, b);
        assert_eq!(b, c);

        let trimmed = QueryKey::new(ResourceKind::Character, 1, Some(" rick "), None);
        assert_eq!(trimmed.name(), Some("rick"));
    }

    #[test]
    fn test_kind_distinguishes_keys() {
        let a = QueryParams::default().key(ResourceKind::Location);
        let b = QueryParams::default().key(ResourceKind::Episode);
        assert_ne!(a, b);
    }

    #[test]
    fn test_filter_change_resets_page() {
        for start_page in [1, 2, 7, 42] {
            let params = QueryParams::default().with_page(start_page);

            let by_name = params.clone().with_name("morty");
            assert_eq!(by_name.key(ResourceKind::Character).page(), 1);

            let by_status = params.clone().with_status(Some(CharacterStatus::Alive));
            assert_eq!(by_status.key(ResourceKind::Character).page(), 1);

            let cleared = by_name.with_page(start_page).with_name("");
            assert_eq!(cleared.page(), 1);
            assert_eq!(cleared.name(), None);
        }
    }

    #[test]
    fn test_unchanged_filter_keeps_page() {
        let params = QueryParams::default().with_name("rick").with_page(3);
        assert_eq!(params.clone().with_name(" rick ").page(), 3);
        assert_eq!(params.with_status(None).page(), 3);
    }

    #[test]
    fn test_page_has_floor_of_one() {
        assert_eq!(QueryParams::default().with_page(0).page(), 1);
    }
}
