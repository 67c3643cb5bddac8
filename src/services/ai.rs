use revox_protocol::api::AiQuestionCreateRequest;
use revox_protocol::common::AiQuestion;

use crate::client::ApiClient;
use crate::error::Result;

pub struct AiService<'a, C: ApiClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ApiClient + ?Sized> AiService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Every question the user has asked
    pub async fn history(&self, user_id: i64) -> Result<Vec<AiQuestion>> {
        self.client.get(&format!("/ai/user/{}", user_id)).await
    }

    /// Ask a question about one bike within one category
    ///
    /// The server answers synchronously; this call can take tens of seconds.
    pub async fn ask(
        &self,
        user_id: i64,
        bike_id: i64,
        category_id: i64,
        request: &AiQuestionCreateRequest,
    ) -> Result<AiQuestion> {
        self.client
            .post(
                &format!(
                    "/ai/user/{}/bike/{}/category/{}",
                    user_id, bike_id, category_id
                ),
                Some(request),
            )
            .await
    }
}
