//! Register a user and print a freshly issued bearer token
//!
//! Usage: create_user <email> [--admin]

use std::env;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, Set};

use pigseller_backend::entities::users;
use pigseller_backend::services::auth::hash_token;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 || (args.len() == 3 && args[2] != "--admin") {
        eprintln!("Usage: {} <email> [--admin]", args[0]);
        eprintln!("Example: {} seller@example.com", args[0]);
        std::process::exit(1);
    }

    let email = args[1].trim().to_string();
    let is_admin = args.len() == 3;

    dotenvy::dotenv().ok();
    let db = Database::connect(env::var("DATABASE_URL")?).await?;

    let uid = uuid::Uuid::new_v4().to_string();
    let token = format!("psk_{}", uuid::Uuid::new_v4().simple());

    let user = users::ActiveModel {
        id: Set(uid.clone()),
        email: Set(email.clone()),
        token_hash: Set(hash_token(&token)),
        is_admin: Set(is_admin),
        created_at: Set(Utc::now().fixed_offset()),
    };
    user.insert(&db).await?;

    println!("Created user {} ({}){}", email, uid, if is_admin { " with admin claim" } else { "" });
    println!("Bearer token (shown once): {}", token);

    Ok(())
}
