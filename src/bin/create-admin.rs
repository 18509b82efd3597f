use sqlx::postgres::PgPoolOptions;
use studio_cms::{
    PostgresRepository, Repository,
    auth::{UserRole, hash_password},
    config::AppConfig,
};

/// create-admin
///
/// One-shot provisioning utility: inserts the initial admin account so the token
/// endpoints have someone to authenticate. Reads ADMIN_EMAIL, ADMIN_PASSWORD and
/// ADMIN_NAME from the environment and is idempotent on the email.
///
/// Usage:
///   ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD=... cargo run --bin create-admin
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL is required");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD is required");
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.db_url)
        .await
        .expect("Failed to connect to Postgres. Check DATABASE_URL.");
    let repo = PostgresRepository::new(pool);

    if let Some(existing) = repo
        .get_user_by_email(&email)
        .await
        .expect("Failed to query users")
    {
        println!("Admin already exists: {} ({})", existing.email, existing.id);
        return;
    }

    let hash = hash_password(&password, config.bcrypt_cost).expect("Failed to hash password");
    let user = repo
        .create_user(&email, &hash, &name, UserRole::Admin)
        .await
        .expect("Failed to insert admin user");

    println!("Admin created: {} ({})", user.email, user.id);
}
