use crate::models::HackerNewsItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Comments,
    Points,
}

impl SortKey {
    /// Numeric columns read best with the largest value first.
    fn descending_by_default(self) -> bool {
        matches!(self, SortKey::Comments | SortKey::Points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub reverse: bool,
}

impl SortState {
    /// Clicking the active column flips direction, any other column starts fresh.
    pub fn select(&mut self, key: SortKey) {
        self.reverse = self.key == key && !self.reverse;
        self.key = key;
    }

    pub fn apply(&self, list: &[HackerNewsItem]) -> Vec<HackerNewsItem> {
        let mut sorted = list.to_vec();
        // sort_by is stable, ties keep fetch order
        match self.key {
            SortKey::None => {}
            SortKey::Title => sorted.sort_by(|a, b| a.title.cmp(&b.title)),
            SortKey::Author => sorted.sort_by(|a, b| a.author.cmp(&b.author)),
            SortKey::Comments => sorted.sort_by_key(|item| item.comment_count),
            SortKey::Points => sorted.sort_by_key(|item| item.points),
        }
        if self.key.descending_by_default() {
            sorted.reverse();
        }
        if self.reverse {
            sorted.reverse();
        }
        sorted
    }

    /// Arrow drawn after a column header; empty for inactive columns.
    pub fn indicator(&self, key: SortKey) -> &'static str {
        if key != self.key || key == SortKey::None {
            return "";
        }
        let pointing_down = key.descending_by_default() != self.reverse;
        if pointing_down {
            "⬇"
        } else {
            "⬆"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, author: &str, comments: u32, points: u32) -> HackerNewsItem {
        HackerNewsItem {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            url: String::new(),
            comment_count: comments,
            points,
            created_at: None,
        }
    }

    fn ids(list: &[HackerNewsItem]) -> Vec<&str> {
        list.iter().map(|i| i.id.as_str()).collect()
    }

    fn sample() -> Vec<HackerNewsItem> {
        vec![
            item("a", "Banana", "zed", 4, 5),
            item("b", "Apple", "mia", 10, 9),
            item("c", "Cherry", "abe", 1, 1),
        ]
    }

    #[test]
    fn none_keeps_fetch_order() {
        let state = SortState::default();
        assert_eq!(ids(&state.apply(&sample())), ["a", "b", "c"]);
    }

    #[test]
    fn text_columns_sort_ascending() {
        let mut state = SortState::default();
        state.select(SortKey::Title);
        assert_eq!(ids(&state.apply(&sample())), ["b", "a", "c"]);
        state.select(SortKey::Author);
        assert_eq!(ids(&state.apply(&sample())), ["c", "b", "a"]);
    }

    #[test]
    fn points_sort_descending_then_ascending_on_second_click() {
        let mut state = SortState::default();
        state.select(SortKey::Points);
        assert!(!state.reverse);
        assert_eq!(ids(&state.apply(&sample())), ["b", "a", "c"]);

        state.select(SortKey::Points);
        assert!(state.reverse);
        assert_eq!(ids(&state.apply(&sample())), ["c", "a", "b"]);
    }

    #[test]
    fn comments_sort_descending() {
        let mut state = SortState::default();
        state.select(SortKey::Comments);
        assert_eq!(ids(&state.apply(&sample())), ["b", "a", "c"]);
    }

    #[test]
    fn switching_key_resets_reverse() {
        let mut state = SortState::default();
        state.select(SortKey::Points);
        state.select(SortKey::Points);
        assert!(state.reverse);

        state.select(SortKey::Author);
        assert_eq!(state, SortState { key: SortKey::Author, reverse: false });
    }

    #[test]
    fn reversed_title_sorts_descending() {
        let mut state = SortState::default();
        state.select(SortKey::Title);
        state.select(SortKey::Title);
        assert_eq!(ids(&state.apply(&sample())), ["c", "a", "b"]);
    }

    #[test]
    fn sorting_leaves_input_untouched() {
        let list = sample();
        let mut state = SortState::default();
        state.select(SortKey::Points);
        let _ = state.apply(&list);
        assert_eq!(ids(&list), ["a", "b", "c"]);
    }

    #[test]
    fn indicator_follows_direction() {
        let mut state = SortState::default();
        assert_eq!(state.indicator(SortKey::Points), "");

        state.select(SortKey::Points);
        assert_eq!(state.indicator(SortKey::Points), "⬇");
        assert_eq!(state.indicator(SortKey::Title), "");
        state.select(SortKey::Points);
        assert_eq!(state.indicator(SortKey::Points), "⬆");

        state.select(SortKey::Title);
        assert_eq!(state.indicator(SortKey::Title), "⬆");
        state.select(SortKey::Title);
        assert_eq!(state.indicator(SortKey::Title), "⬇");
    }
}
