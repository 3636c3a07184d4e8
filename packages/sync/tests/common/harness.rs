//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container per test binary, started and migrated on the first
//! test, then shared. Tests keep apart by using unique part numbers.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use sync_core::kernel::test_dependencies::{MockPageFetcher, MockProductCatalog, MockSheetSource};
use sync_core::kernel::SyncDeps;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

pub const TEST_VENDOR: &str = "Test Vendor";

struct SharedTestInfra {
    db_url: String,
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

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
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

/// Per-test database access on top of the shared container.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let deps = ctx.deps(MockSheetSource::new("VOIP"), MockProductCatalog::new());
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool })
    }

    /// Dependencies backed by the test database and the given mocks.
    pub fn deps(&self, sheets: MockSheetSource, catalog: MockProductCatalog) -> TestDeps {
        let sheets = Arc::new(sheets);
        let catalog = Arc::new(catalog);
        let deps = SyncDeps::new(
            self.db_pool.clone(),
            sheets.clone(),
            catalog.clone(),
            Arc::new(MockPageFetcher::new()),
            TEST_VENDOR.to_string(),
        );
        TestDeps {
            deps,
            sheets,
            catalog,
        }
    }
}

/// `SyncDeps` plus handles on the mocks for assertions.
pub struct TestDeps {
    pub deps: SyncDeps,
    pub sheets: Arc<MockSheetSource>,
    pub catalog: Arc<MockProductCatalog>,
}
