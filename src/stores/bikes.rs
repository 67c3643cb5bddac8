use revox_protocol::common::Bike;

use super::{replace, upsert, StateCell};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikeState {
    pub bikes: Vec<Bike>,
    pub selected: Option<Bike>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// The signed-in user's bikes
#[derive(Debug, Default)]
pub struct BikeStore {
    state: StateCell<BikeState>,
}

impl BikeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BikeState {
        self.state.snapshot()
    }

    pub fn bikes(&self) -> Vec<Bike> {
        self.state.read(|s| s.bikes.clone())
    }

    pub fn selected(&self) -> Option<Bike> {
        self.state.read(|s| s.selected.clone())
    }

    pub fn find(&self, bike_id: i64) -> Option<Bike> {
        self.state
            .read(|s| s.bikes.iter().find(|b| b.id == bike_id).cloned())
    }

    pub fn set_bikes(&self, bikes: Vec<Bike>) {
        self.state.update(|s| {
            s.bikes = bikes;
            s.error = None;
        });
    }

    /// Append a created bike
    pub fn add_bike(&self, bike: Bike) {
        self.state.update(|s| {
            upsert(&mut s.bikes, bike);
            s.error = None;
        });
    }

    /// Replace by id, including the selection
    pub fn update_bike(&self, bike: Bike) {
        self.state.update(|s| {
            if s.selected.as_ref().is_some_and(|sel| sel.id == bike.id) {
                s.selected = Some(bike.clone());
            }
            replace(&mut s.bikes, bike);
            s.error = None;
        });
    }

    /// Remove by id, clearing the selection if it was this bike
    pub fn delete_bike(&self, bike_id: i64) {
        self.state.update(|s| {
            s.bikes.retain(|b| b.id != bike_id);
            if s.selected.as_ref().is_some_and(|sel| sel.id == bike_id) {
                s.selected = None;
            }
            s.error = None;
        });
    }

    pub fn select(&self, bike: Option<Bike>) {
        self.state.update(|s| s.selected = bike);
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.update(|s| s.is_loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.update(|s| s.error = error);
    }

    pub fn clear(&self) {
        self.state.update(|s| *s = BikeState::default());
    }
}
