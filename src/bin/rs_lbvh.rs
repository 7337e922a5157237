// std
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
// others
use clap::Parser;
use log::{info, warn};
// lbvh
use rs_lbvh::accelerators::{create_accelerator, AcceleratorKind, AcceleratorOptions};
use rs_lbvh::blockqueue::{BlockQueue, Tile};
use rs_lbvh::core::accelerator::SpacePartitioner;
use rs_lbvh::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
use rs_lbvh::core::mesh::Mesh;
use rs_lbvh::core::pbrt::Float;
use rs_lbvh::shapes::plymesh::load_ply_mesh;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a bounding volume hierarchy for a PLY mesh and shoot an
/// orthographic grid of rays at it (looking down the negative z axis).
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// use specified number of threads for ray casting
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: u8,
    /// acceleration structure: lbvh or sah
    #[arg(short = 'a', long = "accelerator", default_value = "lbvh")]
    accelerator: String,
    /// number of rays along the longer side of the scene
    #[arg(short = 'r', long = "resolution", default_value_t = 512)]
    resolution: u32,
    /// build the LBVH on the calling thread only
    #[arg(long = "sequential")]
    sequential: bool,
    /// write a depth image (PNG) of the hits
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    /// The path to the PLY file to read
    path: PathBuf,
}

const TILE_SIZE: u32 = 16;

/// Image resolution covering the x/y extent of *bounds*.
fn grid_resolution(bounds: &Bounds3f, resolution: u32) -> (u32, u32) {
    let d: Vector3f = bounds.diagonal();
    let resolution: u32 = resolution.max(1);
    if d.x <= 0.0 && d.y <= 0.0 {
        (1, 1)
    } else if d.x >= d.y {
        let y: u32 = ((resolution as Float * d.y / d.x).round() as u32).max(1);
        (resolution, y)
    } else {
        let x: u32 = ((resolution as Float * d.x / d.y).round() as u32).max(1);
        (x, resolution)
    }
}

/// Ray through the center of pixel *(x, y)*, starting above the scene.
fn primary_ray(bounds: &Bounds3f, res: (u32, u32), x: u32, y: u32) -> Ray {
    let d: Vector3f = bounds.diagonal();
    let fx: Float = (x as Float + 0.5) / res.0 as Float;
    // image rows run top to bottom
    let fy: Float = 1.0 - (y as Float + 0.5) / res.1 as Float;
    let o: Point3f = Point3f::new(
        bounds.p_min.x + fx * d.x,
        bounds.p_min.y + fy * d.y,
        bounds.p_max.z + 1.0 + d.z,
    );
    Ray::new(o, Vector3f::new(0.0, 0.0, -1.0))
}

fn cast_tile(
    accel: &dyn SpacePartitioner,
    mesh: &dyn Mesh,
    bounds: &Bounds3f,
    res: (u32, u32),
    tile: &Tile,
) -> Vec<(u32, u32, Option<Float>)> {
    let mut samples: Vec<(u32, u32, Option<Float>)> = Vec::with_capacity(tile.area());
    for (x, y) in tile.pixels() {
        let ray: Ray = primary_ray(bounds, res, x, y);
        let t: Option<Float> = accel.intersect(mesh, &ray).map(|isect| isect.t);
        samples.push((x, y, t));
    }
    samples
}

fn write_depth_image(
    path: &PathBuf,
    res: (u32, u32),
    depth: &[Option<Float>],
) -> Result<(), Box<dyn Error>> {
    let hits = depth.iter().filter_map(|t| *t);
    let t_min: Float = hits.clone().fold(std::f32::INFINITY, Float::min);
    let t_max: Float = hits.fold(std::f32::NEG_INFINITY, Float::max);
    let range: Float = if t_max > t_min { t_max - t_min } else { 1.0 };
    let img = image::GrayImage::from_fn(res.0, res.1, |x, y| {
        match depth[(y * res.0 + x) as usize] {
            // near is bright, background black
            Some(t) => image::Luma([(255.0 - 223.0 * (t - t_min) / range) as u8]),
            None => image::Luma([0_u8]),
        }
    });
    img.save(path)?;
    println!("Writing depth image {:?} with {}x{} pixels", path, res.0, res.1);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    // handle command line options
    let args = Cli::parse();
    let num_cores: usize = if args.nthreads == 0_u8 {
        num_cpus::get()
    } else {
        args.nthreads as usize
    };
    println!(
        "rs_lbvh version {} [Detected {} cores]",
        VERSION,
        num_cpus::get()
    );
    let mesh = load_ply_mesh(&args.path)?;
    let mut options = AcceleratorOptions {
        kind: AcceleratorKind::from_name(&args.accelerator),
        ..AcceleratorOptions::default()
    };
    options.lbvh.parallel = !args.sequential;
    let start = Instant::now();
    let accel: Box<dyn SpacePartitioner> = create_accelerator(&mesh, &options)?;
    println!(
        "{:?} for {} triangles built in {:?}",
        options.kind,
        mesh.triangle_count(),
        start.elapsed()
    );
    if !accel.is_valid() {
        warn!("bounding volume hierarchy failed its validity check");
    }
    let bounds: Bounds3f = accel.world_bound();
    let res: (u32, u32) = grid_resolution(&bounds, args.resolution);
    info!("casting {}x{} rays over {:?}", res.0, res.1, bounds);
    let mut depth: Vec<Option<Float>> = vec![None; (res.0 * res.1) as usize];
    println!("Casting rays with {:?} thread(s) ...", num_cores);
    let start = Instant::now();
    {
        let block_queue = BlockQueue::new(res, (TILE_SIZE, TILE_SIZE));
        let bq = &block_queue;
        let accel: &dyn SpacePartitioner = accel.as_ref();
        let mesh: &dyn Mesh = &mesh;
        let bounds = &bounds;
        let depth = &mut depth;
        crossbeam::scope(|scope| {
            let (tile_tx, tile_rx) = crossbeam_channel::bounded(num_cores);
            // spawn worker threads
            for _ in 0..num_cores {
                let tile_tx = tile_tx.clone();
                scope.spawn(move |_| {
                    while let Some(tile) = bq.next() {
                        let samples = cast_tile(accel, mesh, bounds, res, &tile);
                        // send the tile through the channel to main thread
                        if tile_tx.send(samples).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tile_tx);
            // collect the tiles
            for _ in pbr::PbIter::new(0..bq.len()) {
                match tile_rx.recv() {
                    Ok(samples) => {
                        for (x, y, t) in samples {
                            depth[(y * res.0 + x) as usize] = t;
                        }
                    }
                    Err(_) => break,
                }
            }
        })
        .map_err(|_| "ray casting thread panicked")?;
    }
    let elapsed = start.elapsed();
    let n_rays: usize = depth.len();
    let n_hits: usize = depth.iter().filter(|t| t.is_some()).count();
    println!(
        "{} of {} rays hit the mesh in {:?} ({:.0} rays/s)",
        n_hits,
        n_rays,
        elapsed,
        n_rays as f64 / elapsed.as_secs_f64().max(1.0e-9)
    );
    if let Some(ref path) = args.output {
        write_depth_image(path, res, &depth)?;
    }
    Ok(())
}
