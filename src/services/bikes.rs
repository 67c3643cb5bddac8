use serde::de::IgnoredAny;

use revox_protocol::api::BikeRequest;
use revox_protocol::common::Bike;

use crate::client::ApiClient;
use crate::error::Result;

pub struct BikeService<'a, C: ApiClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ApiClient + ?Sized> BikeService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<Bike>> {
        self.client.get(&format!("/bikes/user/{}", user_id)).await
    }

    pub async fn get(&self, user_id: i64, bike_id: i64) -> Result<Bike> {
        self.client
            .get(&format!("/bikes/user/{}/bike/{}", user_id, bike_id))
            .await
    }

    pub async fn create(&self, user_id: i64, request: &BikeRequest) -> Result<Bike> {
        self.client
            .post(&format!("/bikes/user/{}", user_id), Some(request))
            .await
    }

    pub async fn update(&self, user_id: i64, bike_id: i64, request: &BikeRequest) -> Result<Bike> {
        self.client
            .patch(
                &format!("/bikes/user/{}/bike/{}", user_id, bike_id),
                Some(request),
            )
            .await
    }

    /// Soft delete; the server keeps the record flagged as deleted
    pub async fn delete(&self, user_id: i64, bike_id: i64) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .patch::<(), _>(
                &format!("/bikes/user/{}/bike/{}/softDelete", user_id, bike_id),
                None,
            )
            .await?;
        Ok(())
    }
}
