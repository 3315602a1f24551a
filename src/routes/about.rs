use rocket::serde::json::Json;
use serde_json::{json, Value};

#[get("/about/author")]
pub fn author() -> Json<Value> {
    Json(json!({
        "title": "About the author",
        "text": "Yatube is a small blogging platform: write posts, gather them in groups, \
                 comment and follow the authors you like.",
    }))
}

#[get("/about/tech")]
pub fn tech() -> Json<Value> {
    Json(json!({
        "title": "Technologies",
        "stack": ["Rust", "Rocket", "Diesel", "SQLite", "PostgreSQL"],
    }))
}
