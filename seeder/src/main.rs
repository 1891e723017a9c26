use std::env;
use std::process::exit;

fn main() {
    let data_dir = env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let out_path = env::args()
        .nth(2)
        .unwrap_or_else(|| "catalog.json".to_string());

    if let Err(e) = seeder::run(&data_dir, &out_path) {
        eprintln!("Seeding failed: {e:#}");
        exit(1);
    }
}
