use discassess::config::DatabaseConfig;
use discassess::database::DatabaseManager;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = DatabaseConfig::from_env();
    println!("🔧 Testing database connection...");
    println!("📊 Database Configuration:");
    println!("  DB_HOST: {}", config.host);
    println!("  DB_PORT: {}", config.port);
    println!("  DB_NAME: {}", config.dbname);
    println!("  DB_USER: {}", config.user);
    println!(
        "  DB_PASSWORD: {}",
        if config.password.is_empty() {
            "<empty>"
        } else {
            "***set***"
        }
    );

    let db = match DatabaseManager::with_config(&config).await {
        Ok(db) => db,
        Err(e) => {
            println!("❌ Connection failed: {}", e);
            std::process::exit(1);
        }
    };

    match db.test_connection().await {
        Ok(version) => println!("✅ Connected: {}", version),
        Err(e) => {
            println!("❌ Test query failed: {}", e);
            std::process::exit(1);
        }
    }

    match db.count_questions().await {
        Ok(count) => println!("📋 Question catalog holds {} entries", count),
        Err(e) => println!("⚠️ Could not count questions (schema missing?): {}", e),
    }
}
