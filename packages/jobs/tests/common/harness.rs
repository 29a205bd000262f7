//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary. Tables are
//! created once on first use; tests keep their rows apart with unique ids.

use anyhow::{Context, Result};
use jobs_core::domains::enrichment::JobExtraction;
use jobs_core::DatabaseConfig;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct SharedTestInfra {
    database: DatabaseConfig,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let database = DatabaseConfig {
            host: postgres.get_host().await?.to_string(),
            port: postgres.get_host_port_ipv4(5432).await?,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
        };

        let pool = PgPool::connect_with(database.connect_options())
            .await
            .context("Failed to connect to Postgres for table setup")?;
        JobExtraction::ensure_table(&pool)
            .await
            .context("Failed to create tables")?;
        pool.close().await;

        Ok(Self {
            database,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test handle on the shared database.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let sink = PostgresJobSink::new(ctx.database.clone());
/// }
/// ```
pub struct TestHarness {
    /// Pool for fixtures and assertions.
    pub db_pool: PgPool,
    /// Connection parameters for code that opens its own connections.
    pub database: DatabaseConfig,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect_with(infra.database.connect_options())
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            database: infra.database.clone(),
        })
    }
}
