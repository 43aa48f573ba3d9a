//! Tests de la API HTTP completa: router real, middleware de auth y
//! respuestas JSON, contra una base de datos de test por caso.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use rental_management::config::environment::EnvironmentConfig;
use rental_management::routes::create_router;
use rental_management::state::AppState;

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: "clave-secreta-solo-para-tests".to_string(),
        jwt_expiration: 3600,
        cors_origins: vec!["*".to_string()],
        admin_email: "admin@rental.test".to_string(),
        admin_password: "admin123".to_string(),
    }
}

fn app(pool: PgPool) -> Router {
    create_router(AppState::new(pool, test_config()))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed_manager(pool: &PgPool, email: &str, password: &str, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    // Coste bajo de bcrypt para no frenar la suite
    let password_hash = bcrypt::hash(password, 4).expect("hash");
    sqlx::query(
        r#"
        INSERT INTO managers (id, first_name, last_name, email, password_hash, role)
        VALUES ($1, 'Test', 'Manager', $2, $3, $4::manager_role)
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .execute(pool)
    .await
    .expect("seed manager");
    id
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    body["token"].as_str().expect("token").to_string()
}

fn car_payload(license_plate: &str) -> Value {
    json!({
        "brand": "Peugeot",
        "model": "208",
        "year": 2023,
        "license_plate": license_plate,
        "color": "bleu",
        "mileage": 1200,
        "daily_price": 45.5,
        "fuel_type": "essence",
        "seats": 5,
        "options": ["gps", "bluetooth"]
    })
}

fn client_payload(email: &str) -> Value {
    json!({
        "first_name": "Luc",
        "last_name": "Moreau",
        "email": email,
        "phone": "0612345678",
        "address": {
            "street": "1 rue de la Paix",
            "city": "Lyon",
            "postal_code": "69001"
        },
        "license_category": "B",
        "license_number": "LIC-2301",
        "id_card_number": "ID-88412"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn health_endpoint_is_public(pool: PgPool) {
    let app = app(pool);

    let response = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "rental-management-api");
}

#[sqlx::test(migrations = "./migrations")]
async fn login_then_me_roundtrip(pool: PgPool) {
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);

    let token = login(&app, "sara@rental.test", "secreta123").await;

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], "sara@rental.test");
    assert!(body.get("password_hash").is_none());

    // Contraseña incorrecta
    let bad = app
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "sara@rental.test", "password": "otra" })),
        ))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(bad).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "./migrations")]
async fn inactive_manager_cannot_login(pool: PgPool) {
    let id = seed_manager(&pool, "baja@rental.test", "secreta123", "manager").await;
    sqlx::query("UPDATE managers SET manager_status = 'inactive' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .expect("deactivate");

    let app = app(pool);
    let response = app
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "baja@rental.test", "password": "secreta123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn writes_require_a_token(pool: PgPool) {
    let app = app(pool);

    let create_car = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/car",
            None,
            Some(car_payload("AB-123-CD")),
        ))
        .await
        .unwrap();
    assert_eq!(create_car.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(create_car).await["code"], "UNAUTHORIZED");

    let list_clients = app
        .oneshot(request(Method::GET, "/api/client", None, None))
        .await
        .unwrap();
    assert_eq!(list_clients.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn car_crud_with_public_catalog(pool: PgPool) {
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);
    let token = login(&app, "sara@rental.test", "secreta123").await;

    // Crear
    let created = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/car",
            Some(&token),
            Some(car_payload("AB-123-CD")),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let created_body = body_json(created).await;
    assert_eq!(created_body["success"], true);
    assert_eq!(created_body["data"]["car_status"], "available");
    let car_id = created_body["data"]["id"].as_str().unwrap().to_string();

    // Matrícula duplicada
    let duplicate = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/car",
            Some(&token),
            Some(car_payload("AB-123-CD")),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(duplicate).await["code"], "CONFLICT");

    // Payload inválido
    let invalid = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/car",
            Some(&token),
            Some(json!({
                "brand": "Peugeot",
                "model": "208",
                "year": 2023,
                "license_plate": "matricula-mala",
                "color": "bleu",
                "mileage": 1200,
                "daily_price": 45.5,
                "fuel_type": "kerosene",
                "seats": 5
            })),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(invalid).await["code"], "VALIDATION_ERROR");

    // El catálogo es público
    let catalog = app
        .clone()
        .oneshot(request(Method::GET, "/api/car", None, None))
        .await
        .unwrap();
    assert_eq!(catalog.status(), StatusCode::OK);
    let cars = body_json(catalog).await;
    assert_eq!(cars.as_array().unwrap().len(), 1);
    assert_eq!(cars[0]["license_plate"], "AB-123-CD");

    // Actualizar
    let updated = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/car/{}", car_id),
            Some(&token),
            Some(json!({ "color": "noir", "mileage": 1500 })),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let updated_body = body_json(updated).await;
    assert_eq!(updated_body["data"]["color"], "noir");
    assert_eq!(updated_body["data"]["mileage"], 1500);

    // Borrar y comprobar el 404
    let deleted = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/car/{}", car_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(body_json(deleted).await["success"], true);

    let missing = app
        .oneshot(request(
            Method::GET,
            &format!("/api/car/{}", car_id),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "./migrations")]
async fn reservation_http_flow(pool: PgPool) {
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);
    let token = login(&app, "sara@rental.test", "secreta123").await;

    let car = body_json(
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/car",
                Some(&token),
                Some(car_payload("AB-123-CD")),
            ))
            .await
            .unwrap(),
    )
    .await;
    let car_id = car["data"]["id"].as_str().unwrap().to_string();

    let client = body_json(
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/client",
                Some(&token),
                Some(client_payload("luc@rental.test")),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(client["success"], true);
    let client_id = client["data"]["id"].as_str().unwrap().to_string();

    // Crear reserva sin precio: 7 días × 45.50
    let created = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/reservation",
            Some(&token),
            Some(json!({
                "client_id": client_id,
                "car_id": car_id,
                "start_date": "2026-07-01",
                "end_date": "2026-07-08"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let created_body = body_json(created).await;
    assert_eq!(created_body["data"]["reservation_status"], "pending");
    assert_eq!(created_body["data"]["rental_days"], 7);
    let total: rust_decimal::Decimal = created_body["data"]["total_price"]
        .as_str()
        .expect("decimal serializes as string")
        .parse()
        .unwrap();
    assert_eq!(total, rust_decimal::Decimal::new(3185, 1));
    let reservation_id = created_body["data"]["id"].as_str().unwrap().to_string();

    // Solape
    let overlap = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/reservation",
            Some(&token),
            Some(json!({
                "client_id": client_id,
                "car_id": car_id,
                "start_date": "2026-07-05",
                "end_date": "2026-07-12"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(overlap.status(), StatusCode::CONFLICT);
    let overlap_body = body_json(overlap).await;
    assert_eq!(overlap_body["code"], "CONFLICT");
    assert_eq!(overlap_body["error"], "Conflict");

    // Rango invertido
    let reversed = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/reservation",
            Some(&token),
            Some(json!({
                "client_id": client_id,
                "car_id": car_id,
                "start_date": "2026-08-10",
                "end_date": "2026-08-01"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(reversed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(reversed).await["code"], "INVALID_RANGE");

    // Aceptar
    let accepted = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &format!("/api/reservation/{}/status", reservation_id),
            Some(&token),
            Some(json!({ "status": "accepted" })),
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(
        body_json(accepted).await["data"]["reservation_status"],
        "accepted"
    );

    // accepted es terminal
    let refuse_after = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &format!("/api/reservation/{}/status", reservation_id),
            Some(&token),
            Some(json!({ "status": "refused" })),
        ))
        .await
        .unwrap();
    assert_eq!(refuse_after.status(), StatusCode::CONFLICT);

    // Registrar pago
    let paid = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &format!("/api/reservation/{}/payment", reservation_id),
            Some(&token),
            Some(json!({ "payment_method": "card", "payment_status": "paid" })),
        ))
        .await
        .unwrap();
    assert_eq!(paid.status(), StatusCode::OK);
    let paid_body = body_json(paid).await;
    assert_eq!(paid_body["data"]["payment_method"], "card");
    assert_eq!(paid_body["data"]["payment_status"], "paid");
}

#[sqlx::test(migrations = "./migrations")]
async fn availability_endpoint_reflects_reservations(pool: PgPool) {
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);
    let token = login(&app, "sara@rental.test", "secreta123").await;

    let car = body_json(
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/car",
                Some(&token),
                Some(car_payload("AB-123-CD")),
            ))
            .await
            .unwrap(),
    )
    .await;
    let car_id = car["data"]["id"].as_str().unwrap().to_string();

    let client = body_json(
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/client",
                Some(&token),
                Some(client_payload("luc@rental.test")),
            ))
            .await
            .unwrap(),
    )
    .await;
    let client_id = client["data"]["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(request(
            Method::POST,
            "/api/reservation",
            Some(&token),
            Some(json!({
                "client_id": client_id,
                "car_id": car_id,
                "start_date": "2026-07-01",
                "end_date": "2026-07-10"
            })),
        ))
        .await
        .unwrap();

    // Durante la reserva el coche no aparece (endpoint público)
    let during = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/car/available?start_date=2026-07-05&end_date=2026-07-08",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(during.status(), StatusCode::OK);
    assert!(body_json(during).await.as_array().unwrap().is_empty());

    // El día de la devolución vuelve a estar libre
    let after = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/car/available?start_date=2026-07-10&end_date=2026-07-12",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(after.status(), StatusCode::OK);
    assert_eq!(body_json(after).await.as_array().unwrap().len(), 1);

    // Fechas malformadas
    let malformed = app
        .oneshot(request(
            Method::GET,
            "/api/car/available?start_date=01/07/2026&end_date=2026-07-12",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(malformed).await["code"], "INVALID_RANGE");
}

#[sqlx::test(migrations = "./migrations")]
async fn manager_routes_are_admin_only(pool: PgPool) {
    let admin_id = seed_manager(&pool, "admin@rental.test", "admin123", "admin").await;
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);

    // Un gestor normal no entra
    let manager_token = login(&app, "sara@rental.test", "secreta123").await;
    let forbidden = app
        .clone()
        .oneshot(request(Method::GET, "/api/manager", Some(&manager_token), None))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(forbidden).await["code"], "FORBIDDEN");

    // El admin sí
    let admin_token = login(&app, "admin@rental.test", "admin123").await;
    let listing = app
        .clone()
        .oneshot(request(Method::GET, "/api/manager", Some(&admin_token), None))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(body_json(listing).await.as_array().unwrap().len(), 2);

    // Alta de un gestor nuevo
    let created = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/manager",
            Some(&admin_token),
            Some(json!({
                "first_name": "Nadia",
                "last_name": "Benali",
                "email": "nadia@rental.test",
                "password": "segura456",
                "role": "manager"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    assert_eq!(body_json(created).await["data"]["role"], "manager");

    // Email repetido
    let duplicate = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/manager",
            Some(&admin_token),
            Some(json!({
                "first_name": "Nadia",
                "last_name": "Benali",
                "email": "nadia@rental.test",
                "password": "segura456"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // Nadie borra su propia cuenta
    let self_delete = app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/manager/{}", admin_id),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(self_delete.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn image_upload_and_serving(pool: PgPool) {
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);
    let token = login(&app, "sara@rental.test", "secreta123").await;

    let car = body_json(
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/car",
                Some(&token),
                Some(car_payload("AB-123-CD")),
            ))
            .await
            .unwrap(),
    )
    .await;
    let car_id = car["data"]["id"].as_str().unwrap().to_string();

    let image_bytes: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-payload";
    let upload = app
        .clone()
        .oneshot(multipart_request(
            &format!("/api/car/{}/image", car_id),
            &token,
            "clio.png",
            "image/png",
            image_bytes,
        ))
        .await
        .unwrap();
    assert_eq!(upload.status(), StatusCode::OK);
    let upload_body = body_json(upload).await;
    assert_eq!(upload_body["success"], true);
    let image_url = upload_body["data"]["image_url"].as_str().unwrap().to_string();

    // La foto se sirve en público con su content type
    let served = app
        .clone()
        .oneshot(request(Method::GET, &image_url, None, None))
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(
        served.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let served_bytes = axum::body::to_bytes(served.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&served_bytes[..], image_bytes);

    // El coche ahora expone la URL de su foto
    let fetched = body_json(
        app.clone()
            .oneshot(request(Method::GET, &format!("/api/car/{}", car_id), None, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(fetched["image_url"], image_url);

    // Tipo no permitido
    let rejected = app
        .oneshot(multipart_request(
            &format!("/api/car/{}/image", car_id),
            &token,
            "notas.txt",
            "text/plain",
            b"no soy una imagen",
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn dashboard_endpoints(pool: PgPool) {
    seed_manager(&pool, "sara@rental.test", "secreta123", "manager").await;
    let app = app(pool);
    let token = login(&app, "sara@rental.test", "secreta123").await;

    app.clone()
        .oneshot(request(
            Method::POST,
            "/api/car",
            Some(&token),
            Some(car_payload("AB-123-CD")),
        ))
        .await
        .unwrap();

    let stats = app
        .clone()
        .oneshot(request(Method::GET, "/api/dashboard/stats", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(stats.status(), StatusCode::OK);
    let stats_body = body_json(stats).await;
    assert_eq!(stats_body["total_cars"], 1);
    assert_eq!(stats_body["available_cars"], 1);
    assert_eq!(stats_body["total_reservations"], 0);

    let upcoming = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/dashboard/upcoming?limit=5",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(upcoming.status(), StatusCode::OK);
    assert!(body_json(upcoming).await.as_array().unwrap().is_empty());

    let calendar = app
        .clone()
        .oneshot(request(Method::GET, "/api/dashboard/calendar", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(calendar.status(), StatusCode::OK);

    // car_id inválido
    let bad_filter = app
        .oneshot(request(
            Method::GET,
            "/api/dashboard/calendar?car_id=no-es-un-uuid",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(bad_filter.status(), StatusCode::BAD_REQUEST);
}

fn multipart_request(
    uri: &str,
    token: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "rental-test-boundary-7f3a";
    let mut payload = Vec::new();
    payload.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    payload.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    payload.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    payload.extend_from_slice(data);
    payload.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(payload))
        .unwrap()
}
