use discassess::database::DatabaseManager;
use discassess::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    println!("🌱 Seeding the question catalog...");

    let db = DatabaseManager::new().await?;
    db.initialize_schema().await?;

    let seeded = seed::seed_question_catalog(&db).await?;
    if seeded > 0 {
        println!("✅ Seeded {} questions", seeded);
    } else {
        println!("✅ Catalog already seeded, nothing to do");
    }

    Ok(())
}
