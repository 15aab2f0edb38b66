//! Application Startup
//!
//! Wiring of stores, the chat service and the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{ChatService, ChatServiceImpl, ChatStores};
use crate::config::Settings;
use crate::domain::ConversationService;
use crate::infrastructure::conversations::HttpConversationClient;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgAuditRepository, PgMentionRepository, PgMessageRepository, PgQuoteRepository,
    PgRoomRepository, PgUserDirectory,
};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatService>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatService>) -> Self {
        Self { chat }
    }
}

/// PostgreSQL-backed stores sharing one pool.
pub fn pg_stores(pool: &PgPool) -> ChatStores {
    ChatStores {
        rooms: Arc::new(PgRoomRepository::new(pool.clone())),
        messages: Arc::new(PgMessageRepository::new(pool.clone())),
        mentions: Arc::new(PgMentionRepository::new(pool.clone())),
        quotes: Arc::new(PgQuoteRepository::new(pool.clone())),
        audit: Arc::new(PgAuditRepository::new(pool.clone())),
        directory: Arc::new(PgUserDirectory::new(pool.clone())),
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        let conversations: Option<Arc<dyn ConversationService>> =
            if settings.conversations.is_enabled() {
                let client = HttpConversationClient::new(&settings.conversations)?;
                tracing::info!(base_url = %settings.conversations.base_url, "Conversation service configured");
                Some(Arc::new(client))
            } else {
                tracing::warn!("Conversation service not configured; quoting is disabled");
                None
            };

        let chat = ChatServiceImpl::new(
            pg_stores(&db),
            conversations,
            settings.chat.clone(),
            settings.conversations.timeout(),
        );
        let state = AppState::new(Arc::new(chat));

        handlers::health::init_server_start();

        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
