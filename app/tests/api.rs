use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use migration::{Migrator, MigratorTrait};
use saaskit::{
    config::config::Config,
    core::{server::build_app, state::AppState},
    database::seed::seed_defaults,
    repos::users::UsersRepo,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-pass";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        server_ip: "127.0.0.1".to_string(),
        max_connections: 1,
        min_connections: 1,
        jwt_secret: "test-signing-secret".to_string(),
        jwt_key_id: "test".to_string(),
        jwt_retired_keys: Vec::new(),
        jwt_expiry_hours: 1,
        bcrypt_cost: 4,
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        tls_cert_path: None,
        tls_key_path: None,
    }
}

async fn spawn_app() -> TestApp {
    let config = test_config();

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    seed_defaults(&db, &config).await.unwrap();

    let state = AppState::new(db.clone(), config).unwrap();

    TestApp {
        router: build_app(state),
        db,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let bearer = format!("Bearer {}", token);
        self.send(method, uri, Some(&bearer), body).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> i32 {
        let (status, user) = self
            .send(
                Method::POST,
                "/users",
                None,
                Some(json!({"email": email, "password": password, "name": "Test User"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        user["id"].as_i64().unwrap() as i32
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await
    }

    async fn token(&self, email: &str, password: &str) -> String {
        let (status, session) = self.login(email, password).await;
        assert_eq!(status, StatusCode::OK);

        session["token"].as_str().unwrap().to_string()
    }

    async fn create_organization(&self, token: &str, name: &str) -> i32 {
        let (status, organization) = self
            .call(
                Method::POST,
                "/organizations",
                token,
                Some(json!({"name": name})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        organization["id"].as_i64().unwrap() as i32
    }
}

#[tokio::test]
async fn sign_up_and_login_issue_a_user_token() {
    let app = spawn_app().await;
    let (status, user) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({"email": "ada@example.com", "password": "pa55word", "name": "Ada"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password_hash").is_none());
    assert!(user.get("verification_token").is_none());
    assert_eq!(user["verified"], false);

    let (status, session) = app.login("ada@example.com", "pa55word").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "user");

    let token = session["token"].as_str().unwrap();
    let (status, me) = app.call(Method::GET, "/auth/me", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["email"], "ada@example.com");

    let (status, _) = app.login("ada@example.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_emails_conflict() {
    let app = spawn_app().await;
    app.sign_up("dup@example.com", "pa55word").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({"email": "dup@example.com", "password": "other", "name": "Dup"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn verification_token_marks_user_verified() {
    let app = spawn_app().await;
    let id = app.sign_up("grace@example.com", "pa55word").await;

    let stored = UsersRepo::new(app.db.clone()).get(id).await.unwrap();
    let token = stored.verification_token.unwrap();
    assert_eq!(token.len(), 43);

    let (status, user) = app
        .send(Method::POST, "/users/verify", None, Some(json!({"token": token})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["verified"], true);

    let (status, _) = app
        .send(Method::POST, "/users/verify", None, Some(json!({"token": token})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_authorization_headers_are_rejected() {
    let app = spawn_app().await;
    app.sign_up("eve@example.com", "pa55word").await;
    let token = app.token("eve@example.com", "pa55word").await;

    for header in [
        "Bearer".to_string(),
        format!("Token {}", token),
        format!("Bearer {} extra", token),
        format!("Bearer  {}", token),
        token.clone(),
    ] {
        let (status, _) = app.send(Method::GET, "/auth/me", Some(&header), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header);
    }

    let (status, _) = app.send(Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_the_admin_role() {
    let app = spawn_app().await;
    app.sign_up("user@example.com", "pa55word").await;
    let user_token = app.token("user@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _) = app
        .call(Method::POST, "/roles", &user_token, Some(json!({"name": "billing"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, role) = app
        .call(Method::POST, "/roles", &admin_token, Some(json!({"name": "billing"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(role["name"], "billing");

    let (status, plans) = app.call(Method::GET, "/plans", &user_token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans, json!([]));
}

#[tokio::test]
async fn login_role_follows_role_rows_and_carries_permissions() {
    let app = spawn_app().await;
    let id = app.sign_up("ops@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, permission) = app
        .call(
            Method::POST,
            "/permissions",
            &admin_token,
            Some(json!({"name": "reports:read"})),
        )
        .await;
    let uri = format!("/users/{}/permissions/{}", id, permission["id"]);
    let (status, _) = app.call(Method::POST, &uri, &admin_token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, session) = app.login("ops@example.com", "pa55word").await;
    assert_eq!(session["role"], "user");
    assert_eq!(session["permissions"], json!(["reports:read"]));

    let (_, roles) = app.call(Method::GET, "/roles", &admin_token, None).await;
    let admin_role = roles
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "admin")
        .unwrap()["id"]
        .clone();
    let uri = format!("/users/{}/roles/{}", id, admin_role);
    let (status, _) = app.call(Method::POST, &uri, &admin_token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, session) = app.login("ops@example.com", "pa55word").await;
    assert_eq!(session["role"], "admin");
}

#[tokio::test]
async fn reserved_roles_cannot_be_deleted() {
    let app = spawn_app().await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, roles) = app.call(Method::GET, "/roles", &admin_token, None).await;
    let user_role = roles
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "user")
        .unwrap()["id"]
        .clone();

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/roles/{}", user_role),
            &admin_token,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn updating_without_a_password_keeps_the_hash() {
    let app = spawn_app().await;
    let id = app.sign_up("kim@example.com", "first-pass").await;
    let token = app.token("kim@example.com", "first-pass").await;
    let uri = format!("/users/{}", id);

    let (status, user) = app
        .call(Method::PUT, &uri, &token, Some(json!({"name": "Kim"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Kim");
    assert_eq!(app.login("kim@example.com", "first-pass").await.0, StatusCode::OK);

    let (status, _) = app
        .call(Method::PUT, &uri, &token, Some(json!({"password": "second-pass"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.login("kim@example.com", "first-pass").await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(app.login("kim@example.com", "second-pass").await.0, StatusCode::OK);
}

#[tokio::test]
async fn users_only_update_themselves() {
    let app = spawn_app().await;
    let victim = app.sign_up("victim@example.com", "pa55word").await;
    app.sign_up("mallory@example.com", "pa55word").await;
    let token = app.token("mallory@example.com", "pa55word").await;

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/users/{}", victim),
            &token,
            Some(json!({"password": "owned"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleted_domains_are_hidden_unless_an_admin_asks() {
    let app = spawn_app().await;
    app.sign_up("owner@example.com", "pa55word").await;
    let token = app.token("owner@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let organization = app.create_organization(&token, "Acme").await;

    let (status, domain) = app
        .call(
            Method::POST,
            "/domains",
            &token,
            Some(json!({"organization_id": organization, "domain": " Acme.Example. "})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(domain["domain"], "acme.example");

    let (status, _) = app
        .call(Method::DELETE, &format!("/domains/{}", domain["id"]), &token, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let listing = format!("/organizations/{}/domains", organization);
    let (_, domains) = app.call(Method::GET, &listing, &token, None).await;
    assert_eq!(domains, json!([]));

    let with_deleted = format!("{}?include_deleted=true", listing);
    let (status, _) = app.call(Method::GET, &with_deleted, &token, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, domains) = app.call(Method::GET, &with_deleted, &admin_token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(domains.as_array().unwrap().len(), 1);
    assert!(!domains[0]["deleted_at"].is_null());

    let (status, _) = app
        .call(Method::GET, &format!("/domains/{}", domain["id"]), &token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_organization_hides_what_it_owns() {
    let app = spawn_app().await;
    let member = app.sign_up("member@example.com", "pa55word").await;
    let token = app.token("member@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let organization = app.create_organization(&token, "Initech").await;

    app.call(
        Method::POST,
        "/domains",
        &token,
        Some(json!({"organization_id": organization, "domain": "initech.test"})),
    )
    .await;
    let (status, seat) = app
        .call(
            Method::POST,
            "/seats",
            &token,
            Some(json!({"organization_id": organization, "user_id": member})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(seat["status"], "invited");

    let uri = format!("/organizations/{}", organization);
    let (status, _) = app.call(Method::DELETE, &uri, &token, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.call(Method::DELETE, &uri, &admin_token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call(Method::GET, &uri, &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, domains) = app
        .call(Method::GET, &format!("{}/domains", uri), &token, None)
        .await;
    assert_eq!(domains, json!([]));
    let (status, _) = app
        .call(Method::GET, &format!("/seats/{}", seat["id"]), &token, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, audit) = app
        .call(Method::GET, &format!("{}/audit-logs", uri), &admin_token, None)
        .await;
    let actions: Vec<&str> = audit
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"create"));
    assert!(actions.contains(&"delete"));
}

#[tokio::test]
async fn subscriptions_start_trialing() {
    let app = spawn_app().await;
    app.sign_up("billing@example.com", "pa55word").await;
    let token = app.token("billing@example.com", "pa55word").await;
    let organization = app.create_organization(&token, "Globex").await;

    let (status, subscription) = app
        .call(
            Method::POST,
            "/subscriptions",
            &token,
            Some(json!({"organization_id": organization})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["status"], "trialing");
    assert_eq!(subscription["start_date"], subscription["created_at"]);

    let uri = format!("/subscriptions/{}/transactions", subscription["id"]);
    let (status, transaction) = app
        .call(
            Method::POST,
            &uri,
            &token,
            Some(json!({
                "amount": 49.0,
                "currency": "USD",
                "status": "succeeded",
                "gateway": "manual",
                "gateway_id": "tx-1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(transaction["subscription_id"], subscription["id"]);

    let (_, transactions) = app.call(Method::GET, &uri, &token, None).await;
    assert_eq!(transactions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn seats_reject_backwards_transitions() {
    let app = spawn_app().await;
    let id = app.sign_up("seat@example.com", "pa55word").await;
    let token = app.token("seat@example.com", "pa55word").await;
    let organization = app.create_organization(&token, "Hooli").await;

    let (_, seat) = app
        .call(
            Method::POST,
            "/seats",
            &token,
            Some(json!({"organization_id": organization, "user_id": id})),
        )
        .await;
    let uri = format!("/seats/{}", seat["id"]);

    let (status, seat) = app
        .call(Method::PUT, &uri, &token, Some(json!({"status": "active"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seat["status"], "active");

    let (status, _) = app
        .call(Method::PUT, &uri, &token, Some(json!({"status": "invited"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            Method::POST,
            "/seats",
            &token,
            Some(json!({"organization_id": organization + 100, "user_id": id})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn workflow_steps_need_distinct_orders() {
    let app = spawn_app().await;
    app.sign_up("flow@example.com", "pa55word").await;
    let token = app.token("flow@example.com", "pa55word").await;
    let organization = app.create_organization(&token, "Umbrella").await;

    let step = |name: &str, order: i32| json!({"name": name, "order": order});

    let (status, _) = app
        .call(
            Method::POST,
            "/workflows",
            &token,
            Some(json!({
                "organization_id": organization,
                "name": "Approval",
                "steps": [step("a", 1), step("b", 1)]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, workflow) = app
        .call(
            Method::POST,
            "/workflows",
            &token,
            Some(json!({
                "organization_id": organization,
                "name": "Approval",
                "steps": [step("second", 2), step("first", 1)]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(workflow["steps"][0]["name"], "first");
}

#[tokio::test]
async fn api_keys_are_generated_and_owned_by_the_caller() {
    let app = spawn_app().await;
    let id = app.sign_up("keys@example.com", "pa55word").await;
    let token = app.token("keys@example.com", "pa55word").await;
    let organization = app.create_organization(&token, "Stark").await;

    let (status, key) = app
        .call(
            Method::POST,
            "/api-keys",
            &token,
            Some(json!({"organization_id": organization, "name": "ci", "permissions": ["deploy"]})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(key["user_id"], id);
    assert_eq!(key["key"].as_str().unwrap().len(), 43);
    assert!(key["last_used_at"].is_null());
}

#[tokio::test]
async fn unknown_routes_fall_through_to_not_found() {
    let app = spawn_app().await;
    let (status, body) = app.send(Method::GET, "/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn api_keys_are_private_to_their_owner() {
    let app = spawn_app().await;
    app.sign_up("keyowner@example.com", "pa55word").await;
    app.sign_up("snoop@example.com", "pa55word").await;
    let owner = app.token("keyowner@example.com", "pa55word").await;
    let snoop = app.token("snoop@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let organization = app.create_organization(&owner, "Wayne").await;

    let (status, created) = app
        .call(
            Method::POST,
            "/api-keys",
            &owner,
            Some(json!({"organization_id": organization, "name": "deploy"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["key"].is_string());
    let uri = format!("/api-keys/{}", created["id"]);

    let (status, _) = app.call(Method::GET, &uri, &snoop, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .call(Method::PUT, &uri, &snoop, Some(json!({"name": "mine now"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.call(Method::DELETE, &uri, &snoop, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let listing = format!("/organizations/{}/api-keys", organization);
    let (status, keys) = app.call(Method::GET, &listing, &snoop, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys.as_array().unwrap().len(), 1);
    assert!(keys[0].get("key").is_none());
    assert_eq!(keys[0]["name"], "deploy");

    let (status, key) = app.call(Method::GET, &uri, &owner, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(key.get("key").is_none());

    let (status, _) = app.call(Method::GET, &uri, &admin_token, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call(Method::DELETE, &uri, &owner, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn audit_entries_are_appended_by_admins_only() {
    let app = spawn_app().await;
    app.sign_up("forger@example.com", "pa55word").await;
    let token = app.token("forger@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let organization = app.create_organization(&token, "Cyberdyne").await;

    let entry = json!({
        "organization_id": organization,
        "action": "export",
        "resource_type": "report",
        "resource_id": 1
    });

    let (status, _) = app
        .call(Method::POST, "/audit-logs", &token, Some(entry.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = app
        .call(Method::POST, "/audit-logs", &admin_token, Some(entry))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["action"], "export");
}

#[tokio::test]
async fn logs_cannot_be_changed_or_deleted() {
    let app = spawn_app().await;
    app.sign_up("logger@example.com", "pa55word").await;
    let token = app.token("logger@example.com", "pa55word").await;
    let admin_token = app.token(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let organization = app.create_organization(&token, "Tyrell").await;

    let (_, audit) = app
        .call(
            Method::POST,
            "/audit-logs",
            &admin_token,
            Some(json!({
                "organization_id": organization,
                "action": "export",
                "resource_type": "report",
                "resource_id": 1
            })),
        )
        .await;
    let (status, activity) = app
        .call(
            Method::POST,
            "/activity",
            &token,
            Some(json!({"organization_id": organization, "activity_type": "login"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let audit_uri = format!("/audit-logs/{}", audit["id"]);
    let activity_uri = format!("/activity/{}", activity["id"]);
    for uri in [&audit_uri, &activity_uri] {
        let (status, _) = app
            .call(Method::PUT, uri, &admin_token, Some(json!({"action": "edited"})))
            .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "PUT {}", uri);

        let (status, _) = app.call(Method::DELETE, uri, &admin_token, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "DELETE {}", uri);
    }

    let (status, entry) = app.call(Method::GET, &audit_uri, &admin_token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["action"], "export");
}

#[tokio::test]
async fn seeded_admin_is_verified() {
    let app = spawn_app().await;
    let (status, session) = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "admin");
    assert_eq!(session["user"]["verified"], true);
}
