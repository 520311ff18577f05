use sea_orm_migration::cli;

#[async_std::main]
async fn main() {
    // DATABASE_URL may come from a .env next to the binary.
    let _ = dotenvy::dotenv();
    cli::run_cli(migration::Migrator).await;
}
