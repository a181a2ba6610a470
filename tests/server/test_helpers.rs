//! Shared test helpers for the server integration suite.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::{App, test, web};
use serde_json::Value;
use tcm_lib::config::Config;
use tcm_lib::db::DbPool;
use tcm_lib::services::{self, MailSender, MemoryMailSender};

pub const ADMIN_NAME: &str = "Grace Admin";
pub const ADMIN_EMAIL: &str = "grace@example.com";
pub const WELCOME_PREFIX: &str = "Welcome Grace Admin Your Password is ";

pub const STATUSES_JSON: &str = r##"[
    {"name": "Untested", "color": "#9e9e9e"},
    {"name": "Passed", "color": "#2e7d32"},
    {"name": "Failed", "color": "#c62828"}
]"##;

/// Write `contents` to a temporary status file.
pub fn status_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

/// Development config pointing at in-memory SQLite and the given status file.
pub fn test_config(statuses_path: &std::path::Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "sqlite::memory:".to_string()),
        ("DB_CONNECT_ATTEMPTS", "1".to_string()),
        ("INITIAL_USER_NAME", ADMIN_NAME.to_string()),
        ("INITIAL_USER_EMAIL", ADMIN_EMAIL.to_string()),
        ("MAIL_USERNAME", "noreply@example.com".to_string()),
        (
            "INITIAL_STATUSES_PATH",
            statuses_path.to_string_lossy().into_owned(),
        ),
    ]);

    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

/// A bootstrapped database plus the credentials mailed to the initial user.
pub struct TestContext {
    pub pool: DbPool,
    pub mailer: Arc<MemoryMailSender>,
    pub admin_password: String,
    _statuses: tempfile::NamedTempFile,
}

impl TestContext {
    pub fn admin(&self) -> (&str, &str) {
        (ADMIN_EMAIL, self.admin_password.as_str())
    }
}

/// Run the full bootstrap and recover the initial user's password from the mail.
pub async fn bootstrap_context() -> TestContext {
    let statuses = status_file(STATUSES_JSON);
    let config = test_config(statuses.path());
    let mailer = Arc::new(MemoryMailSender::new());

    let (pool, _report) = services::bootstrap(&config, mailer.as_ref())
        .await
        .expect("bootstrap");

    let sent = mailer.sent();
    let admin_password = sent[0]
        .body
        .strip_prefix(WELCOME_PREFIX)
        .expect("welcome mail body")
        .to_string();

    TestContext {
        pool,
        mailer,
        admin_password,
        _statuses: statuses,
    }
}

/// Build the app the way `main` does, minus CORS and Swagger.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    create_test_app_with_mailer(ctx, ctx.mailer.clone()).await
}

/// Same as [`create_test_app`] but handlers send mail through `mailer`.
pub async fn create_test_app_with_mailer(
    ctx: &TestContext,
    mailer: Arc<dyn MailSender>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::from(mailer))
            .app_data(tcm_lib::api::json_config())
            .service(web::scope("/api/v1").configure(tcm_lib::api::configure_routes)),
    )
    .await
}

/// Send a request and return the status code and JSON body.
pub async fn call<S>(
    app: &S,
    method: &str,
    uri: &str,
    credentials: Option<(&str, &str)>,
    body: Option<Value>,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = match method {
        "GET" => test::TestRequest::get(),
        "POST" => test::TestRequest::post(),
        "PUT" => test::TestRequest::put(),
        "DELETE" => test::TestRequest::delete(),
        other => panic!("unsupported method {}", other),
    }
    .uri(uri);

    if let Some((email, password)) = credentials {
        req = req.insert_header((
            "Authorization",
            tcm_lib::auth::basic_header_value(email, password),
        ));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// The `id` field of a response body.
pub fn id_of(body: &Value) -> String {
    body["id"]
        .as_str()
        .unwrap_or_else(|| panic!("no id in {}", body))
        .to_string()
}
