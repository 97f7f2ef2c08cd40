//! CLI utility for building navigation meshes and querying paths on them

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nav_common::TriMesh;
use navmesh::{BuildStats, NavMesh, NavMeshConfig};

/// A CLI utility for convex-region navigation meshes
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

/// Construction options shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
struct MeshOptions {
    /// Input mesh file (OBJ format), one region per face
    #[clap(long, value_parser)]
    input: PathBuf,

    /// Maximum distance of a vertex from its region's plane when merging
    #[clap(long, default_value = "0.001")]
    epsilon_coplanar: f32,

    /// Maximum distance of a point from a region's plane to count as inside it
    #[clap(long, default_value = "1.0")]
    epsilon_contains: f32,

    /// Keep the input faces as regions instead of merging them
    #[clap(long)]
    no_merge: bool,
}

impl MeshOptions {
    fn config(&self) -> NavMeshConfig {
        NavMeshConfig {
            epsilon_coplanar: self.epsilon_coplanar,
            epsilon_contains: self.epsilon_contains,
            merge_convex_regions: !self.no_merge,
            ..NavMeshConfig::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a navigation mesh and write its regions and graph as JSON
    Build {
        #[clap(flatten)]
        mesh: MeshOptions,

        /// Output JSON file
        #[clap(long, value_parser)]
        output: PathBuf,
    },

    /// Report the region containing a point
    Locate {
        #[clap(flatten)]
        mesh: MeshOptions,

        /// Position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        point: Vec3,
    },

    /// Find a smoothed path on a navigation mesh
    FindPath {
        #[clap(flatten)]
        mesh: MeshOptions,

        /// Start position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        start: Vec3,

        /// End position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        end: Vec3,

        /// Output path file
        #[clap(long, value_parser)]
        output: Option<PathBuf>,
    },
}

/// Serialized form of a built navigation mesh
#[derive(Serialize, Debug)]
struct NavMeshReport {
    stats: BuildStats,
    regions: Vec<RegionReport>,
    edges: Vec<EdgeReport>,
}

#[derive(Serialize, Debug)]
struct RegionReport {
    index: usize,
    centroid: Vec3,
    contour: Vec<Vec3>,
}

#[derive(Serialize, Debug)]
struct EdgeReport {
    from: usize,
    to: usize,
    cost: f32,
}

impl NavMeshReport {
    fn new(nav_mesh: &NavMesh) -> Self {
        let regions = nav_mesh
            .regions()
            .enumerate()
            .map(|(index, region)| RegionReport {
                index,
                centroid: region.centroid(),
                contour: region.contour(),
            })
            .collect();

        let edges = nav_mesh
            .graph()
            .edges()
            .map(|e| EdgeReport {
                from: e.from,
                to: e.to,
                cost: e.cost,
            })
            .collect();

        Self {
            stats: *nav_mesh.stats(),
            regions,
            edges,
        }
    }
}

/// Parse a comma-separated vector
fn parse_vector(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();

    if parts.len() != 3 {
        return Err(format!(
            "Vector must have 3 components, got {}",
            parts.len()
        ));
    }

    let x = parts[0].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = parts[1].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let z = parts[2].trim().parse::<f32>().map_err(|e| e.to_string())?;

    Ok(Vec3::new(x, y, z))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Commands::Build { mesh, output } => {
            let nav_mesh = load_nav_mesh(&mesh)?;
            write_report(&nav_mesh, &output)
        }
        Commands::Locate { mesh, point } => {
            let nav_mesh = load_nav_mesh(&mesh)?;
            locate(&nav_mesh, point);
            Ok(())
        }
        Commands::FindPath {
            mesh,
            start,
            end,
            output,
        } => {
            let nav_mesh = load_nav_mesh(&mesh)?;
            find_path(&nav_mesh, start, end, output.as_deref())
        }
    }
}

/// Load an OBJ file and build a navigation mesh from its faces
fn load_nav_mesh(options: &MeshOptions) -> Result<NavMesh> {
    log::info!("Loading mesh from {}", options.input.display());

    let mesh = TriMesh::from_obj(&options.input)
        .with_context(|| format!("Failed to load mesh: {}", options.input.display()))?;

    log::info!(
        "Mesh loaded: {} vertices, {} triangles",
        mesh.vert_count,
        mesh.tri_count
    );

    let bounds = mesh.calculate_bounds();
    log::info!("Mesh bounds: min={:?}, max={:?}", bounds.min, bounds.max);

    let nav_mesh = NavMesh::from_tri_mesh(&mesh, options.config())
        .map_err(|e| anyhow!("Failed to build navigation mesh: {}", e))?;

    let stats = nav_mesh.stats();
    log::info!(
        "Navigation mesh built: {} regions from {} faces ({} skipped, {} merged)",
        stats.regions,
        stats.input_polygons,
        stats.skipped_polygons,
        stats.merges_accepted
    );

    Ok(nav_mesh)
}

/// Write the regions and adjacency graph of a navigation mesh as JSON
fn write_report(nav_mesh: &NavMesh, output: &Path) -> Result<()> {
    log::info!("Saving navigation mesh to {}", output.display());

    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &NavMeshReport::new(nav_mesh))
        .context("Failed to write navigation mesh JSON")?;

    Ok(())
}

fn locate(nav_mesh: &NavMesh, point: Vec3) {
    match nav_mesh.region_for_point(&point, nav_mesh.config().epsilon_contains) {
        Some(index) => println!("{:?} is in region {}", point, index),
        None => match nav_mesh.closest_region(&point) {
            Some(index) => println!(
                "{:?} is off the mesh; closest region is {}",
                point, index
            ),
            None => println!("{:?} is off the mesh", point),
        },
    }
}

/// Find a path and print it or write it to `output`
fn find_path(nav_mesh: &NavMesh, start: Vec3, end: Vec3, output: Option<&Path>) -> Result<()> {
    log::info!("Finding path from {:?} to {:?}", start, end);

    let path = nav_mesh.find_path(start, end);
    if path.is_empty() {
        return Err(anyhow!("No path from {:?} to {:?}", start, end));
    }

    log::info!("Generated path with {} waypoints", path.len());

    if let Some(output_path) = output {
        log::info!("Saving path to {}", output_path.display());

        let mut file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
        write_path(&mut file, start, end, &path)?;
    } else {
        println!("Path:");
        for (i, waypoint) in path.iter().enumerate() {
            println!("{}: {},{},{}", i, waypoint.x, waypoint.y, waypoint.z);
        }
    }

    Ok(())
}

fn write_path<W: Write>(out: &mut W, start: Vec3, end: Vec3, path: &[Vec3]) -> Result<()> {
    writeln!(out, "# Path from {:?} to {:?}", start, end)?;
    writeln!(out, "# {} waypoints", path.len())?;

    for waypoint in path {
        writeln!(out, "{},{},{}", waypoint.x, waypoint.y, waypoint.z)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Two unit squares along +X, each as two triangles
    const TWO_SQUARES_OBJ: &str = "\
v 0 0 0
v 0 0 1
v 1 0 1
v 1 0 0
v 2 0 1
v 2 0 0
f 1 2 3
f 1 3 4
f 4 3 5
f 4 5 6
";

    fn options(dir: &TempDir, no_merge: bool) -> MeshOptions {
        let input = dir.path().join("squares.obj");
        fs::write(&input, TWO_SQUARES_OBJ).unwrap();
        MeshOptions {
            input,
            epsilon_coplanar: 1.0e-3,
            epsilon_contains: 1.0,
            no_merge,
        }
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("1,2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(parse_vector(" 1, 2, 3").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("a,b,c").is_err());
    }

    #[test]
    fn test_build_merges_faces() {
        let dir = TempDir::new().unwrap();

        let nav_mesh = load_nav_mesh(&options(&dir, false)).unwrap();
        assert_eq!(nav_mesh.stats().input_polygons, 4);
        assert_eq!(nav_mesh.region_count(), 1);

        let nav_mesh = load_nav_mesh(&options(&dir, true)).unwrap();
        assert_eq!(nav_mesh.region_count(), 4);
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let nav_mesh = load_nav_mesh(&options(&dir, true)).unwrap();
        let output = dir.path().join("mesh.json");

        write_report(&nav_mesh, &output).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["regions"].as_array().unwrap().len(), 4);
        assert_eq!(json["stats"]["input_polygons"], 4);
        // Three shared edges, each traversable both ways
        assert_eq!(json["edges"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_find_path_writes_waypoints() {
        let dir = TempDir::new().unwrap();
        let nav_mesh = load_nav_mesh(&options(&dir, false)).unwrap();
        let output = dir.path().join("path.txt");
        let (start, end) = (Vec3::new(0.5, 0.0, 0.5), Vec3::new(1.5, 0.0, 0.5));

        find_path(&nav_mesh, start, end, Some(output.as_path())).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "# 2 waypoints");
        assert_eq!(lines[2], "0.5,0,0.5");
        assert_eq!(lines[3], "1.5,0,0.5");
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let options = MeshOptions {
            input: dir.path().join("missing.obj"),
            epsilon_coplanar: 1.0e-3,
            epsilon_contains: 1.0,
            no_merge: false,
        };
        assert!(load_nav_mesh(&options).is_err());
    }
}
