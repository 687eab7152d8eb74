//! Register a user through the same validation and hashing path as
//! `POST /users/signup`. Handy for provisioning the first ADMIN.
//!
//! Usage: create-user --email E --password P --first-name F --last-name L --phone N [--role ADMIN|USER]
//!
//! Reads DATABASE_URL and SECRET_KEY like the API server.

use clap::Parser;

use user_auth_api::{
    config::Config,
    db,
    models::user::{SignupRequest, UserRole},
    services::auth::AuthService,
};

#[derive(Parser)]
#[command(name = "create-user", about = "Create a user in the user-auth database")]
struct Args {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    phone: String,
    /// ADMIN or USER
    #[arg(long, default_value = "ADMIN")]
    role: UserRole,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let users = db::connect(&config).await?;

    let ack = AuthService::signup(
        users.as_ref(),
        &config,
        SignupRequest {
            first_name: args.first_name,
            last_name: args.last_name,
            password: args.password,
            email: args.email,
            phone: args.phone,
            user_type: args.role,
        },
    )
    .await?;

    tracing::info!("Created {} user {}", args.role, ack.inserted_id);
    println!("{}", ack.inserted_id);

    Ok(())
}
