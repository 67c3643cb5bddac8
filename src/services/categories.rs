use revox_protocol::common::Category;

use crate::client::ApiClient;
use crate::error::Result;

pub struct CategoryService<'a, C: ApiClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ApiClient + ?Sized> CategoryService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.client.get("/categories").await
    }
}
