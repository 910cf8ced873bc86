use kit::Application;
use talabat_api::{bootstrap, migrations::Migrator, seed::StoreContextSeed};

#[tokio::main]
async fn main() {
    Application::new()
        .migrations::<Migrator>()
        .seeder(StoreContextSeed)
        .compose(bootstrap::compose)
        .run()
        .await;
}
