//! Duka Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use duka_app::{
    database::{self, Db},
    domain::{
        users::{
            PgUsersService, UsersService, hash_token,
            models::{NewUser, Role, UserUuid},
        },
        warehouses::{
            PgWarehousesService, WarehousesService,
            models::{NewWarehouse, WarehouseUuid},
        },
    },
};

#[derive(Debug, Parser)]
#[command(name = "duka-app", about = "Duka CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(UserCommand),
    Warehouse(WarehouseCommand),
}

#[derive(Debug, Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(CreateUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// User email address
    #[arg(long)]
    email: String,

    /// Access role: ADMIN, CASHIER, or CUSTOMER
    #[arg(long, default_value = "CUSTOMER")]
    role: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Optional raw API token; generated when omitted
    #[arg(long)]
    token: Option<String>,
}

#[derive(Debug, Args)]
struct WarehouseCommand {
    #[command(subcommand)]
    command: WarehouseSubcommand,
}

#[derive(Debug, Subcommand)]
enum WarehouseSubcommand {
    Create(CreateWarehouseArgs),
}

#[derive(Debug, Args)]
struct CreateWarehouseArgs {
    /// Warehouse display name
    #[arg(long)]
    name: String,

    /// Warehouse location
    #[arg(long)]
    location: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::User(UserCommand {
            command: UserSubcommand::Create(args),
        }) => create_user(args).await,
        Commands::Warehouse(WarehouseCommand {
            command: WarehouseSubcommand::Create(args),
        }) => create_warehouse(args).await,
    }
}

async fn create_user(args: CreateUserArgs) -> Result<(), String> {
    let role = args
        .role
        .parse::<Role>()
        .map_err(|error| error.to_string())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool));
    let raw_token = args.token.unwrap_or_else(generate_token);

    if raw_token.trim().is_empty() {
        return Err("token cannot be empty".to_string());
    }

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            role,
            token_hash: Some(hash_token(&raw_token)),
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role.as_str());
    println!("api_token: {raw_token}");
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn create_warehouse(args: CreateWarehouseArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgWarehousesService::new(Db::new(pool));

    let warehouse = service
        .create_warehouse(NewWarehouse {
            uuid: WarehouseUuid::new(),
            name: args.name,
            location: args.location,
        })
        .await
        .map_err(|error| format!("failed to create warehouse: {error}"))?;

    println!("warehouse_uuid: {}", warehouse.uuid);
    println!("name: {}", warehouse.name);
    println!("location: {}", warehouse.location);

    Ok(())
}

fn generate_token() -> String {
    format!("dk_{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple())
}
