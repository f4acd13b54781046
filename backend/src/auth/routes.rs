use actix_web::{web, HttpResponse};
use log::{info, warn};
use shared::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};

use crate::db::models::User;
use crate::db::user_repository::{RepositoryError, UserRepository};
use crate::error::AppError;

use super::jwt::JwtService;
use super::middleware::SessionContext;
use super::password::{hash_password, verify_password};

pub async fn register(
    db_repo: web::Data<UserRepository>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest {
        username,
        password,
        confirm_password,
    } = req.into_inner();
    let username = username.trim().to_string();

    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required.".into(),
        ));
    }
    if password != confirm_password {
        return Err(AppError::Validation("Passwords do not match.".into()));
    }
    if db_repo.find_by_username(&username).await?.is_some() {
        info!("Registration refused, username taken: {}", username);
        return Err(RepositoryError::AlreadyExists.into());
    }

    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    let user = User::new(username, password_hash);
    db_repo.create_user(&user).await?;

    info!("Registered user {}", user.username);
    Ok(HttpResponse::Created().json(UserInfo::from(user)))
}

pub async fn login(
    db_repo: web::Data<UserRepository>,
    jwt_service: web::Data<JwtService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = req.into_inner();
    let username = username.trim().to_string();

    let Some(user) = db_repo.find_by_username(&username).await? else {
        warn!("Login failed, unknown user: {}", username);
        return Err(AppError::InvalidCredentials);
    };

    let stored_hash = user.password_hash.clone();
    let verified = web::block(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    if !verified {
        warn!("Login failed, wrong password for user: {}", username);
        return Err(AppError::InvalidCredentials);
    }

    let user = UserInfo::from(user);
    let token = jwt_service.generate_token(&user)?;
    info!("User logged in: {}", user.username);
    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

pub async fn me(
    session: SessionContext,
    db_repo: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    match db_repo.get_user_by_id(session.user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserInfo::from(user))),
        None => {
            warn!("Session refers to a deleted user: {}", session.user_id);
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::middleware::AuthMiddleware;
    use crate::db::user_repository::in_memory;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;
    use shared::ErrorResponse;

    macro_rules! auth_app {
        ($repo:expr, $jwt:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($repo.clone()))
                    .app_data(web::Data::new($jwt.clone()))
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .service(
                        web::scope("/session")
                            .wrap(AuthMiddleware::new($jwt.clone()))
                            .route("/me", web::get().to(me)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn register_login_and_me() {
        let repo = in_memory().await;
        let jwt = JwtService::with_expiration("test-secret", 24);
        let app = auth_app!(repo, jwt);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": " farmer ", "password": "maize", "confirm_password": "maize"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: UserInfo = test::read_body_json(resp).await;
        assert_eq!(created.username, "farmer");

        let stored = repo.find_by_username("farmer").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "maize");

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"username": "farmer", "password": "maize"}))
            .to_request();
        let auth: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(auth.user, created);

        let req = test::TestRequest::get()
            .uri("/session/me")
            .insert_header(("Authorization", format!("Bearer {}", auth.token)))
            .to_request();
        let me: UserInfo = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me, created);
    }

    #[actix_web::test]
    async fn register_rejects_mismatched_passwords() {
        let repo = in_memory().await;
        let jwt = JwtService::with_expiration("test-secret", 24);
        let app = auth_app!(repo, jwt);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "farmer", "password": "a", "confirm_password": "b"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Passwords do not match.");
        assert!(repo.find_by_username("farmer").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn register_rejects_blank_fields() {
        let repo = in_memory().await;
        let jwt = JwtService::with_expiration("test-secret", 24);
        let app = auth_app!(repo, jwt);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "   ", "password": "x", "confirm_password": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn register_rejects_duplicate_username() {
        let repo = in_memory().await;
        let jwt = JwtService::with_expiration("test-secret", 24);
        let app = auth_app!(repo, jwt);

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/register")
                .set_json(json!({"username": "farmer", "password": "p", "confirm_password": "p"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn login_failures_share_one_message() {
        let repo = in_memory().await;
        let jwt = JwtService::with_expiration("test-secret", 24);
        repo.create_user(&User::new("farmer".into(), hash_password("maize").unwrap()))
            .await
            .unwrap();
        let app = auth_app!(repo, jwt);

        for (username, password) in [("farmer", "corn"), ("stranger", "maize")] {
            let req = test::TestRequest::post()
                .uri("/login")
                .set_json(json!({"username": username, "password": password}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body.error, "Invalid username or password");
        }
    }

    #[actix_web::test]
    async fn me_requires_a_token() {
        let repo = in_memory().await;
        let jwt = JwtService::with_expiration("test-secret", 24);
        let app = auth_app!(repo, jwt);

        let req = test::TestRequest::get().uri("/session/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/session/me")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
