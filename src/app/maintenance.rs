//! Maintenance task operations

use revox_protocol::api::{MaintenanceTaskRequest, MaintenanceTaskUpdateRequest};
use revox_protocol::common::{AiQuestion, MaintenanceTask};

use super::{App, OperationKind, Outcome};
use crate::client::ApiClient;
use crate::error::Result;
use crate::query::QueryKey;
use crate::services::MaintenanceService;
use crate::validation::{self, FieldError};

impl<C: ApiClient> App<C> {
    /// Tasks of one bike, optionally narrowed to one category
    pub async fn load_tasks(
        &self,
        bike_id: i64,
        category_id: Option<i64>,
    ) -> Result<Vec<MaintenanceTask>> {
        let kind = OperationKind::LoadTasks;
        let client = &self.client;

        self.maintenance.set_loading(true);
        let result = self
            .read(
                kind,
                QueryKey::maintenance_tasks(Some(bike_id), category_id),
                move || async move {
                    let service = MaintenanceService::new(client);
                    match category_id {
                        Some(category_id) => {
                            service.by_bike_and_category(bike_id, category_id).await
                        }
                        None => service.by_bike(bike_id).await,
                    }
                },
            )
            .await;
        self.maintenance.set_loading(false);

        match result {
            Ok(tasks) => {
                self.maintenance.set_tasks(tasks.clone());
                Ok(tasks)
            }
            Err(e) => {
                self.maintenance
                    .set_error(Some(e.user_message(kind.failure_message())));
                Err(e)
            }
        }
    }

    /// Most recent tasks across every bike of the user, for the dashboard
    pub async fn load_latest_tasks(&self) -> Result<Vec<MaintenanceTask>> {
        let kind = OperationKind::LoadLatestTasks;
        let user_id = self.require_user(kind)?.id;
        let client = &self.client;

        self.read(kind, QueryKey::latest_tasks(user_id), move || async move {
            MaintenanceService::new(client).latest_by_user(user_id).await
        })
        .await
    }

    pub async fn create_task(&self, request: &MaintenanceTaskRequest) -> Outcome<MaintenanceTask> {
        let kind = OperationKind::CreateTask;
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
            || async move { MaintenanceService::new(client).create(request).await },
            |task| {
                self.maintenance.add_task(task.clone());
                self.queries
                    .invalidate(&QueryKey::maintenance_tasks(Some(task.bike_id), None));
                self.queries.invalidate(&QueryKey::latest_tasks(user_id));
            },
        )
        .await
    }

    pub async fn update_task(
        &self,
        task_id: i64,
        request: &MaintenanceTaskUpdateRequest,
    ) -> Outcome<MaintenanceTask> {
        let kind = OperationKind::UpdateTask;
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
            || async move { MaintenanceService::new(client).update(task_id, request).await },
            |task| {
                self.maintenance.update_task(task.clone());
                self.queries
                    .invalidate(&QueryKey::maintenance_tasks(Some(task.bike_id), None));
                self.queries.invalidate(&QueryKey::latest_tasks(user_id));
            },
        )
        .await
    }

    pub async fn delete_task(&self, task_id: i64) -> Outcome<()> {
        let kind = OperationKind::DeleteTask;
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let client = &self.client;
        self.mutate(
            kind,
            || async move { MaintenanceService::new(client).delete(task_id).await },
            |_| {
                self.maintenance.delete_task(task_id);
                self.queries
                    .invalidate(&QueryKey::maintenance_tasks(None, None));
                self.queries.invalidate(&QueryKey::latest_tasks(user_id));
            },
        )
        .await
    }

    /// Turn an answered AI question into a maintenance task
    ///
    /// `edited_answer` replaces the server answer when given. The question
    /// needs a category and the answer must not be empty.
    pub async fn accept_answer(
        &self,
        question: &AiQuestion,
        edited_answer: Option<&str>,
    ) -> Outcome<MaintenanceTask> {
        if question.is_placeholder() {
            return Outcome::Invalid(vec![FieldError::new(
                "answer",
                "The answer is still being generated",
            )]);
        }

        let answer = edited_answer.unwrap_or(&question.answer);
        let request = MaintenanceTaskRequest::from_ai_answer(question, answer);

        let mut errors = Vec::new();
        if request.category_id <= 0 {
            errors.push(FieldError::new("category_id", "The question has no category"));
        }
        if request.description.is_empty() {
            errors.push(FieldError::new("answer", "The answer is empty"));
        }
        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }

        self.create_task(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Level;
    use crate::tests::mocks::{sample_question, sample_task, TestApp};
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_tasks_by_category_uses_narrow_endpoint() {
        let t = TestApp::signed_in(1);
        t.client.reply(
            Method::GET,
            "/maintenance-task/bike/3/category/2",
            json!([sample_task(10, 3, 2, "Brake pads")]),
        );

        let tasks = t.app.load_tasks(3, Some(2)).await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(t.app.maintenance().tasks().len(), 1);
        assert_eq!(t.client.requests()[0].endpoint, "/maintenance-task/bike/3/category/2");
    }

    #[tokio::test]
    async fn test_create_invalidates_every_category_of_the_bike() {
        let t = TestApp::signed_in(1);
        t.client.reply(Method::GET, "/maintenance-task/bike/3/category/2", json!([]));
        t.client
            .reply(Method::POST, "/maintenance-task", sample_task(11, 3, 2, "Chain"));

        t.app.load_tasks(3, Some(2)).await.unwrap();
        let request = MaintenanceTaskRequest {
            name: "Chain".to_string(),
            description: "Clean and lube".to_string(),
            category_id: 2,
            bike_id: 3,
        };
        t.app.create_task(&request).await.applied().unwrap();

        let key = QueryKey::maintenance_tasks(Some(3), Some(2));
        assert!(t.app.queries().status(&key).is_stale);
        assert_eq!(t.app.maintenance().tasks()[0].id, 11);
    }

    #[tokio::test]
    async fn test_task_without_category_rejected() {
        let t = TestApp::signed_in(1);
        let request = MaintenanceTaskRequest {
            name: "Chain".to_string(),
            description: "Clean and lube".to_string(),
            category_id: 0,
            bike_id: 3,
        };

        match t.app.create_task(&request).await {
            Outcome::Invalid(errors) => assert_eq!(errors[0].field, "category_id"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(t.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let t = TestApp::signed_in(1);
        t.client.reply(
            Method::GET,
            "/maintenance-task/bike/3",
            json!([sample_task(10, 3, 2, "Chain"), sample_task(11, 3, 1, "Oil")]),
        );
        t.client
            .reply(Method::PATCH, "/maintenance-task/10", sample_task(10, 3, 2, "Chain kit"));
        t.client.reply_empty(Method::PATCH, "/maintenance-task/11/softDelete");

        t.app.load_tasks(3, None).await.unwrap();
        let update = MaintenanceTaskUpdateRequest {
            name: "Chain kit".to_string(),
            description: "Replaced".to_string(),
        };
        t.app.update_task(10, &update).await.applied().unwrap();
        assert!(t.app.delete_task(11).await.is_applied());

        let tasks = t.app.maintenance().tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Chain kit");
        assert_eq!(
            t.notifier.messages(Level::Success),
            vec!["Maintenance task updated", "Maintenance task deleted"]
        );
    }

    #[tokio::test]
    async fn test_accept_answer_strips_marker() {
        let t = TestApp::signed_in(1);
        t.client
            .reply(Method::POST, "/maintenance-task", sample_task(12, 3, 2, "AI question"));
        let mut question = sample_question(5, 3, 2);
        question.question = "How often should I change the oil?".to_string();
        question.answer = "【注意事項(安全関連のみ)】Every 3000 km".to_string();

        t.app.accept_answer(&question, None).await.applied().unwrap();

        assert_eq!(
            t.client.requests()[0].body,
            Some(json!({
                "name": "AI question: How often should I change the oil?",
                "description": "Every 3000 km",
                "categoryId": 2,
                "bikeId": 3,
            }))
        );
    }

    #[tokio::test]
    async fn test_accept_answer_requires_category_and_answer() {
        let t = TestApp::signed_in(1);
        let mut question = sample_question(5, 3, 0);
        question.answer = String::new();

        match t.app.accept_answer(&question, Some("  ")).await {
            Outcome::Invalid(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(t.client.requests().is_empty());
    }
}
