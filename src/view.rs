//! Filtering and pagination over already-fetched lists

use chrono::{DateTime, Utc};

use revox_protocol::common::{AiQuestion, Bike, MaintenanceTask};

/// Records that list views can sort and filter
pub trait Listable {
    fn created_at(&self) -> DateTime<Utc>;
    fn category_id(&self) -> i64;
}

impl Listable for MaintenanceTask {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn category_id(&self) -> i64 {
        self.category_id
    }
}

impl Listable for AiQuestion {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn category_id(&self) -> i64 {
        self.category_id
    }
}

/// Newest-first list with an optional category filter and 1-based pages
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    category: Option<i64>,
    page: usize,
    page_size: usize,
}

impl<T: Listable> ListView<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let mut items = items;
        sort_newest_first(&mut items);
        Self {
            items,
            category: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Swap in a fresh fetch; the page is kept when it still exists
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        sort_newest_first(&mut self.items);
        self.page = self.clamp(self.page);
    }

    /// Change the category filter and go back to the first page
    pub fn set_filter(&mut self, category: Option<i64>) {
        self.category = category;
        self.page = 1;
    }

    pub fn filter(&self) -> Option<i64> {
        self.category
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go to `page`, clamped into the pages that exist
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = self.clamp(page);
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.page.saturating_sub(1))
    }

    pub fn filtered(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.category.map_or(true, |c| item.category_id() == c))
            .collect()
    }

    pub fn total_items(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        self.total_items().div_ceil(self.page_size)
    }

    /// Items on the current page
    pub fn current_page(&self) -> Vec<&T> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }
}

/// The `count` newest items, for dashboard summaries
pub fn recent<T: Listable + Clone>(items: &[T], count: usize) -> Vec<T> {
    let mut sorted = items.to_vec();
    sort_newest_first(&mut sorted);
    sorted.truncate(count);
    sorted
}

/// Bikes whose manufacturer, model name or model code contains `query`,
/// ignoring case; an empty query keeps every bike
pub fn search_bikes<'a>(bikes: &'a [Bike], query: &str) -> Vec<&'a Bike> {
    let needle = query.to_lowercase();
    bikes
        .iter()
        .filter(|bike| {
            needle.is_empty()
                || bike.manufacturer.to_lowercase().contains(&needle)
                || bike.model_name.to_lowercase().contains(&needle)
                || bike
                    .model_code
                    .as_deref()
                    .is_some_and(|code| code.to_lowercase().contains(&needle))
        })
        .collect()
}

fn sort_newest_first<T: Listable>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
}
