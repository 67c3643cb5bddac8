use serde::de::IgnoredAny;

use revox_protocol::api::{MaintenanceTaskRequest, MaintenanceTaskUpdateRequest};
use revox_protocol::common::MaintenanceTask;

use crate::client::ApiClient;
use crate::error::Result;

pub struct MaintenanceService<'a, C: ApiClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ApiClient + ?Sized> MaintenanceService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &MaintenanceTaskRequest) -> Result<MaintenanceTask> {
        self.client.post("/maintenance-task", Some(request)).await
    }

    /// Most recent tasks across all of a user's bikes
    pub async fn latest_by_user(&self, user_id: i64) -> Result<Vec<MaintenanceTask>> {
        self.client
            .get(&format!("/maintenance-task/user/{}", user_id))
            .await
    }

    pub async fn by_bike(&self, bike_id: i64) -> Result<Vec<MaintenanceTask>> {
        self.client
            .get(&format!("/maintenance-task/bike/{}", bike_id))
            .await
    }

    pub async fn by_bike_and_category(
        &self,
        bike_id: i64,
        category_id: i64,
    ) -> Result<Vec<MaintenanceTask>> {
        self.client
            .get(&format!(
                "/maintenance-task/bike/{}/category/{}",
                bike_id, category_id
            ))
            .await
    }

    pub async fn update(
        &self,
        task_id: i64,
        request: &MaintenanceTaskUpdateRequest,
    ) -> Result<MaintenanceTask> {
        self.client
            .patch(&format!("/maintenance-task/{}", task_id), Some(request))
            .await
    }

    pub async fn delete(&self, task_id: i64) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .patch::<(), _>(&format!("/maintenance-task/{}/softDelete", task_id), None)
            .await?;
        Ok(())
    }
}
