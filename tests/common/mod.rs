#![allow(dead_code)]

use chrono::Utc;
use coursepay::application::coordinator::SettlementCoordinator;
use coursepay::application::enrollment::EnrollmentApplier;
use coursepay::application::identity::IdentitySync;
use coursepay::application::ledger::PurchaseLedger;
use coursepay::application::progress::ProgressTracker;
use coursepay::application::rating::RatingService;
use coursepay::domain::course::{Chapter, Course, Discount, EducatorRef, Lecture, Price};
use coursepay::domain::ports::{CheckoutGatewayRef, CourseStore, UserStore};
use coursepay::domain::user::User;
use coursepay::infrastructure::checkout::StubCheckoutGateway;
use coursepay::infrastructure::in_memory::{
    InMemoryCourseStore, InMemoryProgressStore, InMemoryPurchaseStore, InMemoryUserStore,
};
use coursepay::interfaces::http::AppState;
use rust_decimal::Decimal;
use std::sync::Arc;

/// All services wired over shared in-memory stores, with concrete store
/// handles kept so tests can inspect state directly.
pub struct TestApp {
    pub identity: IdentitySync,
    pub coordinator: SettlementCoordinator,
    pub applier: EnrollmentApplier,
    pub tracker: ProgressTracker,
    pub ratings: RatingService,
    pub users: Arc<InMemoryUserStore>,
    pub courses: Arc<InMemoryCourseStore>,
    pub purchases: Arc<InMemoryPurchaseStore>,
    pub progress: Arc<InMemoryProgressStore>,
}

pub fn test_app() -> TestApp {
    test_app_with_gateway(Arc::new(StubCheckoutGateway::new("https://pay.example.com")))
}

pub fn test_app_with_gateway(gateway: CheckoutGatewayRef) -> TestApp {
    let users = Arc::new(InMemoryUserStore::new());
    let courses = Arc::new(InMemoryCourseStore::new());
    let purchases = Arc::new(InMemoryPurchaseStore::new());
    let progress = Arc::new(InMemoryProgressStore::new());

    let ledger = PurchaseLedger::new(purchases.clone(), users.clone(), courses.clone());
    let applier = EnrollmentApplier::new(users.clone(), courses.clone());
    let coordinator = SettlementCoordinator::new(
        ledger,
        applier.clone(),
        users.clone(),
        courses.clone(),
        gateway,
        "usd",
        None,
    );

    TestApp {
        identity: IdentitySync::new(users.clone()),
        coordinator,
        applier,
        tracker: ProgressTracker::new(users.clone(), courses.clone(), progress.clone()),
        ratings: RatingService::new(users.clone(), courses.clone()),
        users,
        courses,
        purchases,
        progress,
    }
}

impl TestApp {
    pub fn state(&self) -> AppState {
        AppState {
            identity: self.identity.clone(),
            coordinator: self.coordinator.clone(),
            applier: self.applier.clone(),
            tracker: self.tracker.clone(),
            ratings: self.ratings.clone(),
        }
    }

    pub async fn seed_user(&self, id: &str) {
        self.users
            .store(User::new(id, format!("{id}@example.com"), "Test Student", ""))
            .await
            .unwrap();
    }

    /// Seeds the standard test course: two chapters, lectures `lec1`..`lec4`,
    /// priced 89.99 with a 25% discount (effective 67.49).
    pub async fn seed_course(&self, id: &str) {
        self.courses.store(sample_course(id)).await.unwrap();
    }
}

fn lecture(id: &str, order: u32) -> Lecture {
    Lecture {
        id: id.into(),
        title: format!("Lecture {order}"),
        duration_minutes: 15,
        preview_free: order == 1,
        video_url: format!("https://videos.example.com/{id}"),
        order,
    }
}

pub fn sample_course(id: &str) -> Course {
    Course {
        id: id.into(),
        title: "Complete Web Development Bootcamp".into(),
        description: "From zero to deployed".into(),
        price: Price::new(Decimal::new(8999, 2)).unwrap(),
        discount: Discount::new(25).unwrap(),
        thumbnail_url: String::new(),
        chapters: vec![
            Chapter {
                id: "ch1".into(),
                title: "Introduction".into(),
                order: 1,
                lectures: vec![lecture("lec1", 1), lecture("lec2", 2)],
            },
            Chapter {
                id: "ch2".into(),
                title: "Fundamentals".into(),
                order: 2,
                lectures: vec![lecture("lec3", 3), lecture("lec4", 4)],
            },
        ],
        enrolled_students: vec![],
        ratings: vec![],
        educator: EducatorRef {
            id: "edu-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        },
        created_at: Utc::now(),
    }
}
