//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/generator traits, but AppState pins
//! them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use junochat_core::character::service::CharacterService;
use junochat_core::chat::service::ChatService;
use junochat_core::chat::turn::TurnCoordinator;
use junochat_core::user::service::UserService;
use junochat_infra::config::{load_app_config, resolve_data_dir};
use junochat_infra::reply::HttpReplyGenerator;
use junochat_infra::sqlite::character::SqliteCharacterRepository;
use junochat_infra::sqlite::chat::SqliteChatRepository;
use junochat_infra::sqlite::pool::{DatabasePool, default_database_url};
use junochat_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteUserService = UserService<SqliteUserRepository>;

pub type ConcreteCharacterService = CharacterService<SqliteCharacterRepository>;

pub type ConcreteChatService = ChatService<SqliteChatRepository, SqliteCharacterRepository>;

pub type ConcreteTurnCoordinator =
    TurnCoordinator<SqliteChatRepository, SqliteCharacterRepository, HttpReplyGenerator>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<ConcreteUserService>,
    pub character_service: Arc<ConcreteCharacterService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub turn_coordinator: Arc<ConcreteTurnCoordinator>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database (runs migrations)
        let db_pool = DatabasePool::new(&default_database_url()).await?;

        let config = load_app_config(&data_dir).await;

        // Wire services, one repository instance each
        let user_service = UserService::new(SqliteUserRepository::new(db_pool.clone()));
        let character_service =
            CharacterService::new(SqliteCharacterRepository::new(db_pool.clone()));
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteCharacterRepository::new(db_pool.clone()),
        );

        // The coordinator gets its own repositories and the HTTP generator.
        // Its timeout mirrors the generator's so a hung connection and a slow
        // response degrade the same way.
        let generator = HttpReplyGenerator::from_config(&config.generator);
        let turn_coordinator = TurnCoordinator::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteCharacterRepository::new(db_pool.clone()),
            generator,
            Duration::from_secs(config.generator.timeout_secs),
        );

        Ok(Self {
            user_service: Arc::new(user_service),
            character_service: Arc::new(character_service),
            chat_service: Arc::new(chat_service),
            turn_coordinator: Arc::new(turn_coordinator),
            data_dir,
            db_pool,
        })
    }
}
