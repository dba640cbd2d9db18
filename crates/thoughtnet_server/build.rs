use dotenv::dotenv;
use std::env;

fn main() {
    dotenv().ok();

    // compile-time defaults, each can still be overridden by the runtime environment
    let mongodb_uri = env::var("MONGODB_URI").unwrap_or("mongodb://127.0.0.1:27017".to_string());
    println!("cargo:rustc-env=MONGODB_URI={}", mongodb_uri);
    let database_name = env::var("DATABASE_NAME").unwrap_or("socialnetworkDB".to_string());
    println!("cargo:rustc-env=DATABASE_NAME={}", database_name);
    let store = env::var("THOUGHTNET_STORE").unwrap_or("mongo".to_string());
    println!("cargo:rustc-env=THOUGHTNET_STORE={}", store);
    let port = env::var("PORT").unwrap_or("3001".to_string());
    println!("cargo:rustc-env=PORT={}", port);

    for var in ["MONGODB_URI", "DATABASE_NAME", "THOUGHTNET_STORE", "PORT"] {
        println!("cargo:rerun-if-env-changed={}", var);
    }
}
