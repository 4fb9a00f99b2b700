use clap::{Parser, Subcommand};
use log::{debug, info};
use std::fs::File;

use map_annotate::{
    basemap::Basemap,
    config::{read_config_json, SessionConfig},
    distance::{format_distance, path_length_km},
    geometry::{Geometry, GeometryType, LngLat},
    io::{read_features_geojson, read_to_string, write_features_geojson},
    memory::MemoryEngine,
    script::{self, parse_script},
    session::MapSession,
};

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    if let Ok(path) = std::env::var("MAP_ANNOTATE_LOG") {
        match File::create(&path) {
            Ok(file) => {
                env_logger::Builder::from_env(env)
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path, e);
                env_logger::Builder::from_env(env).init();
            }
        }
    } else {
        env_logger::Builder::from_env(env).init();
    }
}

fn load_config(path: Option<&str>) -> Option<SessionConfig> {
    match path {
        None => Some(SessionConfig::default()),
        Some(path) => match read_config_json(path) {
            Ok(cfg) => {
                debug!("loaded configuration from {}", path);
                Some(cfg)
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                None
            }
        },
    }
}

/// Command line front end for the map annotation session.
#[derive(Parser)]
#[command(name = "map_annotate_cli", version)]
struct Cli {
    /// Session configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the great-circle length of a path of lng,lat points.
    Distance {
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<LngLat>,
        /// Also print the length of every leg.
        #[arg(long)]
        legs: bool,
    },
    /// List the available basemaps.
    Basemaps,
    /// Replay an interaction script against the headless engine.
    Replay {
        script: String,
        /// Write the resulting drawings to this GeoJSON file.
        #[arg(long)]
        output: Option<String>,
        /// Basemap to start with, overriding the configuration.
        #[arg(long)]
        basemap: Option<Basemap>,
        /// Complete every style load immediately instead of on `ready`.
        #[arg(long)]
        auto_ready: bool,
    },
    /// Summarise the drawings in a GeoJSON file.
    Inspect { input: String },
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Distance { points, legs } => {
            if legs {
                for (i, pair) in points.windows(2).enumerate() {
                    println!("Leg {}: {}", i + 1, format_distance(path_length_km(pair)));
                }
            }
            println!(
                "Distance over {} points: {}",
                points.len(),
                format_distance(path_length_km(&points))
            );
        }
        Commands::Basemaps => {
            for b in Basemap::all() {
                println!("{:<10}{}", b.name(), b.label());
            }
        }
        Commands::Replay {
            script: path,
            output,
            basemap,
            auto_ready,
        } => {
            let Some(mut config) = load_config(cli.config.as_deref()) else {
                std::process::exit(1);
            };
            if let Some(basemap) = basemap {
                config.default_basemap = basemap;
            }
            let steps = match read_to_string(&path) {
                Ok(text) => match parse_script(&text) {
                    Ok(steps) => steps,
                    Err(e) => {
                        eprintln!("Error parsing {}: {}", path, e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("Error reading {}: {}", path, e);
                    std::process::exit(1);
                }
            };

            info!("replaying {} steps from {}", steps.len(), path);
            let mut session = MapSession::new(MemoryEngine::new(), &config);
            if auto_ready {
                script::deliver_ready(&mut session);
            }
            script::run(&mut session, &steps, auto_ready);

            let features = session.features();
            println!("Basemap: {}", session.basemap());
            println!("Mode: {}", session.mode());
            if session.is_restyling() {
                println!("Style: loading");
            }
            println!("Features: {}", features.len());
            if let Some(label) = session.measure_label() {
                println!("Measured: {}", label);
            }
            if let Some(output) = output {
                match write_features_geojson(&output, &features) {
                    Ok(()) => println!("Wrote {}", output),
                    Err(e) => {
                        eprintln!("Error writing {}: {}", output, e);
                        std::process::exit(1);
                    }
                }
            }
        }
        Commands::Inspect { input } => match read_features_geojson(&input) {
            Ok(features) => {
                debug!("read {} features from {}", features.len(), input);
                for t in GeometryType::all() {
                    println!("{}: {}", t.as_str(), features.of_type(*t).count());
                }
                for f in features.of_type(GeometryType::LineString) {
                    if let Geometry::LineString(pts) = &f.geometry {
                        println!(
                            "Line {}: {}",
                            f.id,
                            format_distance(path_length_km(pts))
                        );
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", input, e);
                std::process::exit(1);
            }
        },
    }
}
