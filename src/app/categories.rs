use revox_protocol::common::Category;

use super::{App, OperationKind};
use crate::client::ApiClient;
use crate::error::Result;
use crate::query::QueryKey;
use crate::services::CategoryService;

impl<C: ApiClient> App<C> {
    /// Category reference data; cached far longer than user data
    pub async fn load_categories(&self) -> Result<Vec<Category>> {
        let client = &self.client;
        let categories = self
            .read_with(
                OperationKind::LoadCategories,
                QueryKey::categories(),
                self.config.category_stale_time(),
                move || async move { CategoryService::new(client).list().await },
            )
            .await?;
        self.maintenance.set_categories(categories.clone());
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::mocks::TestApp;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_categories_cached() {
        let t = TestApp::signed_in(1);
        t.client.reply(
            Method::GET,
            "/categories",
            json!([{"id": 1, "name": "Engine"}, {"id": 2, "name": "Brakes"}]),
        );

        t.app.load_categories().await.unwrap();
        let second = t.app.load_categories().await.unwrap();

        assert_eq!(second.len(), 2);
        assert_eq!(t.client.requests().len(), 1);
        assert_eq!(t.app.maintenance().category_name(2).as_deref(), Some("Brakes"));
    }
}
