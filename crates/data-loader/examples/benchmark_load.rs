use data_loader::MovieCatalog;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/movies.jsonl"));

    println!("Loading movie catalog from {}...\n", path.display());

    let start = Instant::now();
    let catalog = MovieCatalog::load_from_file(&path).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let with_cast = catalog.movies().iter().filter(|m| !m.cast.is_empty()).count();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Movies with cast: {}", with_cast);
    println!(
        "\nPerformance: {:.0} documents/second",
        catalog.len() as f64 / elapsed.as_secs_f64()
    );
}
