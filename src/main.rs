use migration::{Migrator, MigratorTrait};
use service::config::AppConfig;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let db = service::connect(&config).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
    }
    let _rocket = api::build(db, &config)?.launch().await?;
    Ok(())
}
