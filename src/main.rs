use actix_web::{App, HttpServer, web};
use clap::Parser;
use coursepay::application::coordinator::SettlementCoordinator;
use coursepay::application::enrollment::EnrollmentApplier;
use coursepay::application::identity::IdentitySync;
use coursepay::application::ledger::PurchaseLedger;
use coursepay::application::progress::ProgressTracker;
use coursepay::application::rating::RatingService;
use coursepay::domain::ports::{
    CheckoutGatewayRef, CourseStoreRef, ProgressStoreRef, PurchaseStoreRef, UserStoreRef,
};
use coursepay::infrastructure::checkout::StubCheckoutGateway;
use coursepay::infrastructure::in_memory::{
    InMemoryCourseStore, InMemoryProgressStore, InMemoryPurchaseStore, InMemoryUserStore,
};
use coursepay::interfaces::http::{self, AppState};
use coursepay::interfaces::seed::{self, CourseSeeder};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Base URL of the hosted checkout page used in redirect URLs
    #[arg(long, default_value = "https://checkout.example.com")]
    checkout_url: String,

    /// ISO currency code quoted to the payment processor
    #[arg(long, default_value = "usd")]
    currency: String,

    /// Hours before an abandoned pending purchase is failed on read; 0 disables
    #[arg(long, default_value_t = 24)]
    pending_ttl_hours: i64,

    /// JSON file with courses to load into the course store at startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

struct Stores {
    users: UserStoreRef,
    courses: CourseStoreRef,
    purchases: PurchaseStoreRef,
    progress: ProgressStoreRef,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            courses: Arc::new(InMemoryCourseStore::new()),
            purchases: Arc::new(InMemoryPurchaseStore::new()),
            progress: Arc::new(InMemoryProgressStore::new()),
        }
    }

    #[cfg(feature = "storage-rocksdb")]
    fn rocksdb(path: &std::path::Path) -> Result<Self> {
        let store = coursepay::infrastructure::rocksdb::RocksDbStore::open(path)
            .into_diagnostic()?;
        Ok(Self {
            users: Arc::new(store.clone()),
            courses: Arc::new(store.clone()),
            purchases: Arc::new(store.clone()),
            progress: Arc::new(store),
        })
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let stores = match &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Stores::rocksdb(path)?,
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "--db-path requires the storage-rocksdb feature; rebuild with --features storage-rocksdb"
            ));
        }
        None => Stores::in_memory(),
    };

    if let Some(path) = &cli.seed {
        let file = File::open(path).into_diagnostic()?;
        let courses = CourseSeeder::new(BufReader::new(file))
            .courses()
            .into_diagnostic()?;
        seed::apply(&stores.courses, courses)
            .await
            .into_diagnostic()?;
    }

    let gateway: CheckoutGatewayRef = Arc::new(StubCheckoutGateway::new(&cli.checkout_url));
    let pending_ttl =
        (cli.pending_ttl_hours > 0).then(|| chrono::Duration::hours(cli.pending_ttl_hours));

    let ledger = PurchaseLedger::new(
        stores.purchases.clone(),
        stores.users.clone(),
        stores.courses.clone(),
    );
    let applier = EnrollmentApplier::new(stores.users.clone(), stores.courses.clone());
    let state = web::Data::new(AppState {
        identity: IdentitySync::new(stores.users.clone()),
        coordinator: SettlementCoordinator::new(
            ledger,
            applier.clone(),
            stores.users.clone(),
            stores.courses.clone(),
            gateway,
            cli.currency.clone(),
            pending_ttl,
        ),
        applier,
        tracker: ProgressTracker::new(
            stores.users.clone(),
            stores.courses.clone(),
            stores.progress.clone(),
        ),
        ratings: RatingService::new(stores.users.clone(), stores.courses.clone()),
    });

    info!(bind = %cli.bind, "starting settlement service");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(http::configure))
        .bind(&cli.bind)
        .into_diagnostic()?
        .run()
        .await
        .into_diagnostic()?;

    Ok(())
}
