use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use dialoguer::{Confirm, Password};

use revox_protocol::api::{strip_safety_marker, BikeRequest};
use revox_protocol::common::{AiQuestion, Bike, Category, MaintenanceTask, User};

use crate::app::{App, AskQuestion, Outcome};
use crate::client::HttpClient;
use crate::commands::{
    AcceptArgs, AskArgs, BikeCommand, BikeFields, BikesArgs, Commands, ConfigArgs, HistoryArgs,
    LoginArgs, ProfileArgs, ProfileCommand, TaskCommand, TasksArgs,
};
use crate::config::{Config, ConfigService};
use crate::error::{Result, RevoxError};
use crate::forms::{BikeForm, TaskForm};
use crate::navigation::Route;
use crate::notify::ConsoleNotifier;
use crate::storage::{FileStorage, KeyValueStorage, AUTH_TOKEN_KEY};
use crate::token;
use crate::ui::{with_spinner, UI};
use crate::utils::{
    bike_label, category_label, format_date, format_relative, format_timestamp, or_missing,
    truncate,
};
use crate::version::format_version_info;
use crate::view::{recent, search_bikes, ListView};

/// Tasks shown on the dashboard
const DASHBOARD_TASKS: usize = 3;

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    ui: UI,
    reported: bool,
}

impl CliHandler {
    /// Create a new CLI handler with a custom config path
    pub fn with_config_path(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ui: UI::new(),
            reported: false,
        }
    }

    /// Whether the last failure was already shown to the user
    pub fn has_reported(&self) -> bool {
        self.reported
    }

    /// Load configuration using the handler's config path
    fn load_config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Build the app over the session file and restore any saved session
    fn connect(&self, config: &Config) -> Result<App<HttpClient>> {
        let storage = Arc::new(FileStorage::new(config.session_file()));
        let app = App::connect(config.clone(), storage, Arc::new(ConsoleNotifier::new()))?;
        app.restore_session();
        Ok(app)
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Guest => self.handle_guest().await,
            Commands::Logout => self.handle_logout(),
            Commands::Status => self.handle_status(),
            Commands::Dashboard => self.handle_dashboard().await,
            Commands::Profile(args) => self.handle_profile(args).await,
            Commands::Bikes(args) => self.handle_bikes(args).await,
            Commands::Categories => self.handle_categories().await,
            Commands::Tasks(args) => self.handle_tasks(args).await,
            Commands::Ask(args) => self.handle_ask(args).await,
            Commands::History(args) => self.handle_history(args).await,
            Commands::Accept(args) => self.handle_accept(args).await,
            Commands::Config(args) => self.handle_config(args).await,
        }
    }

    /// Handle login command
    async fn handle_login(&mut self, args: LoginArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;

        let id_token = match args.id_token {
            Some(token) => token,
            None => Password::new()
                .with_prompt("Google ID token")
                .allow_empty_password(true)
                .interact()?,
        };

        let outcome = app.login_with_google(&id_token).await;
        if let Some(user) = self.settle(outcome)? {
            self.ui.info(&format!("Welcome, {}", user.nickname));
        }
        Ok(())
    }

    async fn handle_guest(&mut self) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        let outcome = app.login_as_guest().await;
        self.settle(outcome)?;
        Ok(())
    }

    /// Handle logout command
    fn handle_logout(&mut self) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        if !app.auth().is_authenticated() {
            self.ui.info("Not signed in");
            return Ok(());
        }
        app.logout();
        Ok(())
    }

    /// Handle status command
    fn handle_status(&mut self) -> Result<()> {
        let config = self.load_config()?;
        let had_token = FileStorage::new(config.session_file())
            .get(AUTH_TOKEN_KEY)
            .ok()
            .flatten();
        let app = self.connect(&config)?;
        let authenticated = app.auth().is_authenticated();
        let expired = had_token.is_some() && !authenticated;

        let mut rows = vec![
            ("Version", format_version_info()),
            (
                "Session",
                self.ui.format_auth_status(authenticated, expired),
            ),
        ];

        if let Some(user) = app.auth().user() {
            rows.push(("Nickname", self.ui.format_user_field(Some(user.nickname))));
            rows.push(("Email", self.ui.format_user_field(Some(user.display_email))));
            let expires = app
                .auth()
                .token()
                .and_then(|t| token::expiration_time(&t))
                .map(|at| format_timestamp(&at));
            rows.push(("Expires", self.ui.format_user_field(expires)));
        }

        rows.push(("API endpoint", config.api_base_url.clone()));
        rows.push(("Session file", config.session_file().display().to_string()));

        self.ui.card("Status", rows);
        Ok(())
    }

    async fn handle_dashboard(&mut self) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        let user = self.require_session(&app, Route::Dashboard)?;

        let bikes = self.loaded(app.load_bikes().await)?;
        let categories = self.loaded(app.load_categories().await)?;
        let latest = self.loaded(app.load_latest_tasks().await)?;

        self.ui.header("Dashboard");
        self.ui.info(&format!("Welcome back, {}", user.nickname));
        self.ui.blank_line();

        self.ui.card(
            "Overview",
            vec![
                ("Bikes", bikes.len().to_string()),
                ("Maintenance records", latest.len().to_string()),
            ],
        );

        self.ui.header("Recent maintenance");
        let recent_tasks = recent(&latest, DASHBOARD_TASKS);
        if recent_tasks.is_empty() {
            self.ui.info("No maintenance recorded yet");
        }
        for (index, task) in recent_tasks.iter().enumerate() {
            self.print_task(index + 1, task, &bikes, &categories);
        }
        Ok(())
    }

    async fn handle_profile(&mut self, args: ProfileArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        let user = self.require_session(&app, Route::Profile)?;

        match args.command {
            ProfileCommand::Show => {
                self.ui.card(
                    "Profile",
                    vec![
                        ("Nickname", user.nickname.clone()),
                        ("Email", self.ui.format_user_field(Some(user.display_email.clone()))),
                        ("Member since", format_timestamp(&user.created_at)),
                        ("Account", if user.is_guest() { "Guest" } else { "Google" }.to_string()),
                    ],
                );
                Ok(())
            }
            ProfileCommand::Update { nickname } => {
                let outcome = app.update_profile(&nickname).await;
                self.settle(outcome)?;
                Ok(())
            }
            ProfileCommand::Delete { force } => {
                if !force && !self.confirm("Delete your account? This cannot be undone")? {
                    return Ok(());
                }
                let outcome = app.delete_account().await;
                self.settle(outcome)?;
                Ok(())
            }
        }
    }

    async fn handle_bikes(&mut self, args: BikesArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        self.require_session(&app, Route::Bikes)?;

        match args.command {
            BikeCommand::List { search } => {
                let bikes = self.loaded(app.load_bikes().await)?;
                self.ui.header("Bikes");
                if bikes.is_empty() {
                    self.ui.info("No bikes registered yet");
                    return Ok(());
                }
                let shown = search_bikes(&bikes, search.as_deref().unwrap_or_default());
                if shown.is_empty() {
                    self.ui.info("No bikes match the search");
                }
                for (index, bike) in shown.into_iter().enumerate() {
                    self.ui.list_item(index + 1, &bike.display_name(), &bike_summary(bike));
                }
                Ok(())
            }
            BikeCommand::Show { bike_id } => {
                app.open(&Route::BikeDetail { bike_id }.path());
                let bike = self.loaded(app.load_bike(bike_id).await)?;
                self.print_bike(&bike);
                Ok(())
            }
            BikeCommand::Add(fields) => {
                let form = apply_fields(BikeForm::default(), fields);
                let request = self.form_request(&form)?;
                let outcome = app.create_bike(&request).await;
                if let Some(bike) = self.settle(outcome)? {
                    self.print_bike(&bike);
                }
                Ok(())
            }
            BikeCommand::Edit { bike_id, fields } => {
                let bike = self.loaded(app.load_bike(bike_id).await)?;
                let form = apply_fields(BikeForm::from_bike(&bike), fields);
                let request = self.form_request(&form)?;
                let outcome = app.update_bike(bike_id, &request).await;
                if let Some(bike) = self.settle(outcome)? {
                    self.print_bike(&bike);
                }
                Ok(())
            }
            BikeCommand::Remove { bike_id, force } => {
                if !force && !self.confirm(&format!("Delete bike #{}?", bike_id))? {
                    return Ok(());
                }
                let outcome = app.delete_bike(bike_id).await;
                self.settle(outcome)?;
                Ok(())
            }
        }
    }

    async fn handle_categories(&mut self) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        self.require_session(&app, Route::Maintenance)?;

        let categories = self.loaded(app.load_categories().await)?;
        self.ui.header("Categories");
        for category in &categories {
            println!("{:>4}  {}", category.id, category.name);
        }
        Ok(())
    }

    async fn handle_tasks(&mut self, args: TasksArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        self.require_session(&app, Route::Maintenance)?;

        match args.command {
            TaskCommand::List {
                bike_id,
                category,
                page,
            } => {
                let bikes = self.loaded(app.load_bikes().await)?;
                let categories = self.loaded(app.load_categories().await)?;
                let tasks = self.loaded(app.load_tasks(bike_id, category).await)?;

                let mut view = ListView::new(tasks, config.page_size);
                view.set_filter(category);
                view.set_page(page);

                self.ui.header(&format!(
                    "Maintenance: {}",
                    bike_label(&bikes, bike_id)
                ));
                if view.total_items() == 0 {
                    self.ui.info("No maintenance tasks");
                    return Ok(());
                }
                let offset = (view.page() - 1) * view.page_size();
                for (index, task) in view.current_page().into_iter().enumerate() {
                    self.print_task(offset + index + 1, task, &bikes, &categories);
                }
                self.ui.blank_line();
                self.ui
                    .pager(view.page(), view.total_pages(), view.total_items());
                Ok(())
            }
            TaskCommand::Add {
                bike_id,
                category,
                name,
                description,
            } => {
                let form = TaskForm { name, description };
                let outcome = app
                    .create_task(&form.to_create_request(bike_id, category))
                    .await;
                self.settle(outcome)?;
                Ok(())
            }
            TaskCommand::Edit {
                task_id,
                name,
                description,
            } => {
                let form = TaskForm { name, description };
                let outcome = app.update_task(task_id, &form.to_update_request()).await;
                self.settle(outcome)?;
                Ok(())
            }
            TaskCommand::Remove { task_id, force } => {
                if !force && !self.confirm(&format!("Delete maintenance task #{}?", task_id))? {
                    return Ok(());
                }
                let outcome = app.delete_task(task_id).await;
                self.settle(outcome)?;
                Ok(())
            }
        }
    }

    async fn handle_ask(&mut self, args: AskArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        self.require_session(&app, Route::Ai)?;

        let form = AskQuestion {
            bike_id: args.bike_id,
            category_id: args.category_id,
            question: args.question.join(" "),
        };
        let outcome = with_spinner(
            "Generating an answer from the AI...",
            app.ask_question(&form),
        )
        .await;

        if let Some(answered) = self.settle(outcome)? {
            self.print_answer(&answered);
        }
        Ok(())
    }

    async fn handle_history(&mut self, args: HistoryArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        self.require_session(&app, Route::AiHistory)?;

        let bikes = self.loaded(app.load_bikes().await)?;
        let categories = self.loaded(app.load_categories().await)?;
        let history = self.loaded(app.load_history().await)?;

        let mut view = ListView::new(history, config.page_size);
        view.set_filter(args.category);
        view.set_page(args.page);

        self.ui.header("AI history");
        if view.total_items() == 0 {
            self.ui.info("No questions yet");
            return Ok(());
        }
        let now = Utc::now();
        let offset = (view.page() - 1) * view.page_size();
        for (index, question) in view.current_page().into_iter().enumerate() {
            let detail = format!(
                "#{} · {} · {} · {}",
                question.id,
                bike_label(&bikes, question.bike_id),
                category_label(&categories, question.category_id),
                format_relative(&question.created_at, now)
            );
            self.ui
                .list_item(offset + index + 1, &truncate(&question.question, 60), &detail);
        }
        self.ui.blank_line();
        self.ui
            .pager(view.page(), view.total_pages(), view.total_items());
        Ok(())
    }

    async fn handle_accept(&mut self, args: AcceptArgs) -> Result<()> {
        let config = self.load_config()?;
        let app = self.connect(&config)?;
        self.require_session(&app, Route::Ai)?;

        let history = self.loaded(app.load_history().await)?;
        let Some(question) = history.iter().find(|q| q.id == args.question_id) else {
            return Err(RevoxError::invalid_input(format!(
                "No AI question with id {}",
                args.question_id
            )));
        };

        let outcome = app.accept_answer(question, args.answer.as_deref()).await;
        if let Some(task) = self.settle(outcome)? {
            self.ui.info(&format!("Created task #{}: {}", task.id, task.name));
        }
        Ok(())
    }

    /// Handle config command
    async fn handle_config(&mut self, args: ConfigArgs) -> Result<()> {
        let config = self.load_config()?;
        let mut service = match self.config_path.clone() {
            Some(path) => ConfigService::with_config_path(config, path),
            None => ConfigService::new(config),
        };
        service.handle_config(args.command).await
    }

    /// Guard a protected view; signed-out users are sent to sign in
    fn require_session(&mut self, app: &App<HttpClient>, route: Route) -> Result<User> {
        if app.open(&route.path()) == Route::Login {
            self.ui
                .error("Not signed in. Run `revox login` or `revox guest` first.");
            self.reported = true;
            return Err(RevoxError::session_not_found());
        }
        app.current_user()
    }

    /// Outcome of a mutation; failures were already notified
    fn settle<T>(&mut self, outcome: Outcome<T>) -> Result<Option<T>> {
        match outcome {
            Outcome::Applied(value) => Ok(Some(value)),
            Outcome::Skipped => {
                self.ui.warning("The same operation is already in progress");
                Ok(None)
            }
            Outcome::Invalid(errors) => {
                self.ui.error("Please fix the following:");
                self.ui.field_errors(&errors);
                self.reported = true;
                Err(RevoxError::validation(errors))
            }
            Outcome::Failed(error) => {
                self.reported = true;
                Err(error)
            }
        }
    }

    /// Result of a page load; failures were already notified
    fn loaded<T>(&mut self, result: Result<T>) -> Result<T> {
        result.inspect_err(|_| {
            self.ui.info("Run the command again to retry.");
            self.reported = true;
        })
    }

    fn form_request(&mut self, form: &BikeForm) -> Result<BikeRequest> {
        form.to_request().map_err(|errors| {
            self.ui.error("Please fix the following:");
            self.ui.field_errors(&errors);
            self.reported = true;
            RevoxError::validation(errors)
        })
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        if !confirmed {
            self.ui.info("Cancelled");
        }
        Ok(confirmed)
    }

    fn print_bike(&self, bike: &Bike) {
        self.ui.card(
            &bike.display_name(),
            vec![
                ("ID", bike.id.to_string()),
                ("Manufacturer", bike.manufacturer.clone()),
                ("Model", bike.model_name.clone()),
                ("Model code", or_missing(bike.model_code.as_deref())),
                ("Model year", or_missing(bike.model_year)),
                (
                    "Mileage",
                    or_missing(bike.current_mileage.map(|m| format!("{} km", m))),
                ),
                ("Purchased", format_date(bike.purchase_date.as_deref())),
                ("Image", or_missing(bike.image_url.as_deref())),
                ("Registered", format_timestamp(&bike.created_at)),
            ],
        );
    }

    fn print_task(
        &self,
        index: usize,
        task: &MaintenanceTask,
        bikes: &[Bike],
        categories: &[Category],
    ) {
        let detail = format!(
            "#{} · {} · {} · {} · {}",
            task.id,
            bike_label(bikes, task.bike_id),
            category_label(categories, task.category_id),
            self.ui.format_completion(task.is_completed),
            format_timestamp(&task.created_at)
        );
        self.ui.list_item(index, &task.name, &detail);
        if !task.description.is_empty() {
            println!("     {}", truncate(&task.description, 100));
        }
    }

    fn print_answer(&self, answered: &AiQuestion) {
        self.ui.box_content("Question", vec![answered.question.clone()]);
        self.ui.header("Answer");
        println!("{}", strip_safety_marker(&answered.answer).trim());
        self.ui.blank_line();
        self.ui.info(&format!(
            "Save it as a maintenance task with `revox accept {}`",
            answered.id
        ));
    }
}

/// Overlay the flags that were given onto a form
fn apply_fields(mut form: BikeForm, fields: BikeFields) -> BikeForm {
    let BikeFields {
        manufacturer,
        model_name,
        model_code,
        model_year,
        mileage,
        purchase_date,
        image_url,
    } = fields;

    for (slot, value) in [
        (&mut form.manufacturer, manufacturer),
        (&mut form.model_name, model_name),
        (&mut form.model_code, model_code),
        (&mut form.model_year, model_year),
        (&mut form.current_mileage, mileage),
        (&mut form.purchase_date, purchase_date),
        (&mut form.image_url, image_url),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }
    form
}

fn bike_summary(bike: &Bike) -> String {
    let mut parts = vec![format!("#{}", bike.id)];
    if let Some(year) = bike.model_year {
        parts.push(year.to_string());
    }
    if let Some(mileage) = bike.current_mileage {
        parts.push(format!("{} km", mileage));
    }
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fields_overrides_only_given() {
        let base = BikeForm {
            manufacturer: "Yamaha".to_string(),
            model_name: "SR400".to_string(),
            current_mileage: "1000".to_string(),
            ..BikeForm::default()
        };
        let form = apply_fields(
            base,
            BikeFields {
                mileage: Some("1500".to_string()),
                model_code: Some(String::new()),
                ..BikeFields::default()
            },
        );
        assert_eq!(form.manufacturer, "Yamaha");
        assert_eq!(form.current_mileage, "1500");
        assert_eq!(form.model_code, "");
    }

    #[test]
    fn test_bike_summary() {
        let bike: Bike = serde_json::from_value(serde_json::json!({
            "id": 4,
            "userId": 1,
            "manufacturer": "Yamaha",
            "modelName": "SR400",
            "modelYear": 2018,
            "currentMileage": 1200,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00",
        }))
        .unwrap();
        assert_eq!(bike_summary(&bike), "#4 · 2018 · 1200 km");
    }
}
