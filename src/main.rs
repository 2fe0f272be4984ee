//! Terrain Evolve CLI - Evolve a terrain map and save the best one.

use std::fs;
use std::path::PathBuf;
use std::process;

use terrain_evolve::{
    EvolutionEngine, export,
    schema::{EvolutionConfig, TerrainType},
};

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [OUTPUT] [--config PATH] [--seed N] [--summary PATH]",
        program
    );
    eprintln!();
    eprintln!("Evolve a grass/river/mountain map and save the best one.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  OUTPUT          Map file to write (default: map1.txt)");
    eprintln!("  --config PATH   JSON evolution configuration");
    eprintln!("  --seed N        Random seed (overrides the configuration)");
    eprintln!("  --summary PATH  Write the run result as JSON");
    eprintln!("  --example       Print an example configuration");
    eprintln!();
    eprintln!("       {} render MAP TILE_DIR [IMAGE]", program);
    eprintln!();
    eprintln!("Draw a saved map with grass.png, river.png and mountain.png tiles");
    eprintln!("from TILE_DIR (default IMAGE: generated_map.png).");
}

struct Args {
    output: PathBuf,
    config: Option<PathBuf>,
    seed: Option<u64>,
    summary: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        output: PathBuf::from("map1.txt"),
        config: None,
        seed: None,
        summary: None,
    };
    let mut output_set = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed requires a value")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("Invalid seed: {}", value))?;
                parsed.seed = Some(seed);
            }
            "--summary" => {
                let path = iter.next().ok_or("--summary requires a path")?;
                parsed.summary = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option: {}", flag));
            }
            path if !output_set => {
                parsed.output = PathBuf::from(path);
                output_set = true;
            }
            extra => return Err(format!("Unexpected argument: {}", extra)),
        }
    }

    Ok(parsed)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print_example_config();
        return;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return;
    }

    if args.get(1).map(String::as_str) == Some("render") {
        run_render(&args);
        return;
    }

    let args_parsed = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage(&args[0]);
        process::exit(1);
    });

    // Load configuration
    let mut config: EvolutionConfig = match &args_parsed.config {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                process::exit(1);
            })
        }
        None => EvolutionConfig::default(),
    };
    if args_parsed.seed.is_some() {
        config.random_seed = args_parsed.seed;
    }

    println!("Terrain Evolution");
    println!("=================");
    println!(
        "Grid: {}x{} (border {})",
        config.grid.rows, config.grid.cols, config.grid.border
    );
    println!("Population: {}", config.population.size);
    println!("Generations: {}", config.population.max_generations);
    if let Some(seed) = config.random_seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    });

    let result = engine.run_with_callback(|progress| {
        println!(
            "Generation {}: Best Fitness = {}",
            progress.generation, progress.generation_best
        );
    });

    let best = &result.best;
    println!();
    println!("Final best fitness: {}", best.fitness);
    println!(
        "  Regions: grass={}, river={}, mountain={}",
        best.report.regions.get(TerrainType::Grass),
        best.report.regions.get(TerrainType::River),
        best.report.regions.get(TerrainType::Mountain)
    );
    println!(
        "  Cells: river={}, mountain={}",
        best.report.river_cells, best.report.mountain_cells
    );
    println!(
        "Time: {:.2}s ({:.1} evaluations/s)",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second
    );

    if let Err(e) = export::save_map(&best.grid, &args_parsed.output) {
        eprintln!(
            "Error writing map to {}: {}",
            args_parsed.output.display(),
            e
        );
        process::exit(1);
    }
    println!("Map saved to {}", args_parsed.output.display());

    if let Some(path) = &args_parsed.summary {
        let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
            eprintln!("Error serializing summary: {}", e);
            process::exit(1);
        });
        if let Err(e) = fs::write(path, json) {
            eprintln!("Error writing summary to {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("Summary saved to {}", path.display());
    }
}

/// `render MAP TILE_DIR [IMAGE]`
fn run_render(args: &[String]) {
    if args.len() < 4 || args.len() > 5 {
        print_usage(&args[0]);
        process::exit(1);
    }
    let map_path = PathBuf::from(&args[2]);
    let tile_dir = PathBuf::from(&args[3]);
    let image_path = PathBuf::from(args.get(4).map_or("generated_map.png", String::as_str));

    let grid = export::load_map(&map_path).unwrap_or_else(|e| {
        eprintln!("Error reading map {}: {}", map_path.display(), e);
        process::exit(1);
    });
    let tiles = export::TileSet::load_dir(&tile_dir).unwrap_or_else(|e| {
        eprintln!("Error loading tiles: {}", e);
        process::exit(1);
    });

    if let Err(e) = export::save_rendered_map(&grid, &tiles, &image_path) {
        eprintln!("Error rendering map: {}", e);
        process::exit(1);
    }
    let (tile_width, tile_height) = tiles.tile_size();
    println!(
        "Map image saved as {} ({}x{} cells, {}x{} tiles)",
        image_path.display(),
        grid.rows(),
        grid.cols(),
        tile_width,
        tile_height
    );
}

fn print_example_config() {
    let config = EvolutionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            process::exit(1);
        }
    }
}
