#[tokio::main]
async fn main() {
    #[cfg(feature = "seed")]
    {
        seeder::run("data", "catalog.json").unwrap();
    }

    server::start_server().await;
}
