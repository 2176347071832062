//! Build script for petfriends
//!
//! Injects the build-time default for PETFRIENDS_API_URL. It can still be
//! overridden at runtime via the same environment variable.

fn main() {
    // Load .env file if present (for local development)
    let _ = dotenvy::dotenv();

    let api_url = std::env::var("PETFRIENDS_API_URL")
        .unwrap_or_else(|_| "https://petfriends.skillfactory.ru".to_string());

    println!("cargo:rustc-env=PETFRIENDS_API_URL={}", api_url);

    println!("cargo:rerun-if-env-changed=PETFRIENDS_API_URL");
    println!("cargo:rerun-if-changed=.env");
}
