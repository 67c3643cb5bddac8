//! Bike operations

use revox_protocol::api::BikeRequest;
use revox_protocol::common::Bike;

use super::{App, OperationKind, Outcome};
use crate::client::ApiClient;
use crate::error::Result;
use crate::query::QueryKey;
use crate::services::BikeService;
use crate::validation;

impl<C: ApiClient> App<C> {
    /// The user's bikes, mirrored into the bike store
    pub async fn load_bikes(&self) -> Result<Vec<Bike>> {
        let kind = OperationKind::LoadBikes;
        let user_id = self.require_user(kind)?.id;
        let client = &self.client;

        self.bikes.set_loading(true);
        let result = self
            .read(kind, QueryKey::bikes(user_id), move || async move {
                BikeService::new(client).list(user_id).await
            })
            .await;
        self.bikes.set_loading(false);

        match result {
            Ok(bikes) => {
                self.bikes.set_bikes(bikes.clone());
                Ok(bikes)
            }
            Err(e) => {
                self.bikes.set_error(Some(e.user_message(kind.failure_message())));
                Err(e)
            }
        }
    }

    /// One bike, which also becomes the selected bike
    pub async fn load_bike(&self, bike_id: i64) -> Result<Bike> {
        let kind = OperationKind::LoadBike;
        let user_id = self.require_user(kind)?.id;
        let client = &self.client;

        let bike = self
            .read(kind, QueryKey::bike(user_id, bike_id), move || async move {
                BikeService::new(client).get(user_id, bike_id).await
            })
            .await?;
        self.bikes.select(Some(bike.clone()));
        Ok(bike)
    }

    pub async fn create_bike(&self, request: &BikeRequest) -> Outcome<Bike> {
        let kind = OperationKind::CreateBike;
        let errors = validation::check(request);
        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let client = &self.client;
        self.mutate(
            kind,
            || async move { BikeService::new(client).create(user_id, request).await },
            |bike| {
                self.bikes.add_bike(bike.clone());
                self.queries.invalidate(&QueryKey::bikes(user_id));
            },
        )
        .await
    }

    pub async fn update_bike(&self, bike_id: i64, request: &BikeRequest) -> Outcome<Bike> {
        let kind = OperationKind::UpdateBike;
        let errors = validation::check(request);
        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let client = &self.client;
        self.mutate(
            kind,
            || async move {
                BikeService::new(client)
                    .update(user_id, bike_id, request)
                    .await
            },
            |bike| {
                self.bikes.update_bike(bike.clone());
                self.queries.invalidate(&QueryKey::bikes(user_id));
                self.queries.invalidate(&QueryKey::bike(user_id, bike_id));
            },
        )
        .await
    }

    pub async fn delete_bike(&self, bike_id: i64) -> Outcome<()> {
        let kind = OperationKind::DeleteBike;
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let client = &self.client;
        self.mutate(
            kind,
            || async move { BikeService::new(client).delete(user_id, bike_id).await },
            |_| {
                self.bikes.delete_bike(bike_id);
                self.queries.invalidate(&QueryKey::bikes(user_id));
                self.queries.invalidate(&QueryKey::bike(user_id, bike_id));
            },
        )
        .await
    }
}
