use revox_protocol::common::{Category, MaintenanceTask};

use super::{replace, upsert, StateCell};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceState {
    pub tasks: Vec<MaintenanceTask>,
    pub categories: Vec<Category>,
    pub selected: Option<MaintenanceTask>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Maintenance tasks of the bike on screen, plus the category list
#[derive(Debug, Default)]
pub struct MaintenanceStore {
    state: StateCell<MaintenanceState>,
}

impl MaintenanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MaintenanceState {
        self.state.snapshot()
    }

    pub fn tasks(&self) -> Vec<MaintenanceTask> {
        self.state.read(|s| s.tasks.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read(|s| s.categories.clone())
    }

    pub fn category_name(&self, category_id: i64) -> Option<String> {
        self.state.read(|s| {
            s.categories
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| c.name.clone())
        })
    }

    pub fn set_tasks(&self, tasks: Vec<MaintenanceTask>) {
        self.state.update(|s| {
            s.tasks = tasks;
            s.error = None;
        });
    }

    pub fn add_task(&self, task: MaintenanceTask) {
        self.state.update(|s| {
            upsert(&mut s.tasks, task);
            s.error = None;
        });
    }

    pub fn update_task(&self, task: MaintenanceTask) {
        self.state.update(|s| {
            if s.selected.as_ref().is_some_and(|sel| sel.id == task.id) {
                s.selected = Some(task.clone());
            }
            replace(&mut s.tasks, task);
            s.error = None;
        });
    }

    pub fn delete_task(&self, task_id: i64) {
        self.state.update(|s| {
            s.tasks.retain(|t| t.id != task_id);
            if s.selected.as_ref().is_some_and(|sel| sel.id == task_id) {
                s.selected = None;
            }
            s.error = None;
        });
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        self.state.update(|s| {
            s.categories = categories;
            s.error = None;
        });
    }

    pub fn select(&self, task: Option<MaintenanceTask>) {
        self.state.update(|s| s.selected = task);
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.update(|s| s.is_loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.update(|s| s.error = error);
    }

    pub fn clear(&self) {
        self.state.update(|s| *s = MaintenanceState::default());
    }
}
