use std::env;

fn main() {
    dotenvy::dotenv().ok();
    println!("cargo:rerun-if-env-changed=DATABASE_URL");

    if env::var("DATABASE_URL").is_err() {
        println!("cargo:warning=Required environment variable DATABASE_URL is not set.");
    }
}
