//! Shared builders for unit tests.

use crate::domain::course::{Chapter, Course, Discount, EducatorRef, Lecture, Price};
use crate::domain::user::User;
use chrono::Utc;
use rust_decimal::Decimal;

pub fn sample_user(id: &str) -> User {
    User::new(id, format!("{id}@example.com"), "Test Student", "")
}

fn sample_lecture(id: &str, order: u32) -> Lecture {
    Lecture {
        id: id.into(),
        title: format!("Lecture {order}"),
        duration_minutes: 15,
        preview_free: order == 1,
        video_url: format!("https://videos.example.com/{id}"),
        order,
    }
}

/// A course with two chapters and lectures `lec1`..`lec4`.
pub fn sample_course(id: &str, price: Decimal, discount: u8) -> Course {
    Course {
        id: id.into(),
        title: "Complete Web Development Bootcamp".into(),
        description: "From zero to deployed".into(),
        price: Price::new(price).unwrap(),
        discount: Discount::new(discount).unwrap(),
        thumbnail_url: String::new(),
        chapters: vec![
            Chapter {
                id: "ch1".into(),
                title: "Introduction".into(),
                order: 1,
                lectures: vec![sample_lecture("lec1", 1), sample_lecture("lec2", 2)],
            },
            Chapter {
                id: "ch2".into(),
                title: "Fundamentals".into(),
                order: 2,
                lectures: vec![sample_lecture("lec3", 3), sample_lecture("lec4", 4)],
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
