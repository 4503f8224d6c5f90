use cucumber::{cli, World};
use cucumber_tests::features::world::AclWorld;

#[tokio::main]
async fn main() {
    // Run every access-control scenario
    AclWorld::cucumber()
        .with_cli::<()>(cli::Opts::parsed())
        .run_and_exit("features/")
        .await;
}
