//! Quick GPU check utility: lists adapters and runs one generation on each backend
use life_compute::{create_backend, device_info, gpu_available};
use life_core::{patterns, Boundary, ComputeBackendType, Grid, LifeConfig};

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    println!("=== Life GPU Check ===\n");
    println!("GPU Available: {}", gpu_available());
    println!("\nDevices found:");
    for device in device_info() {
        println!("  🎮 {} ", device.name);
        println!("     Vendor: {}", device.vendor);
        println!("     Type: {}", device.device_type);
        println!("     Backend: {}", device.backend);
        println!();
    }

    let seed = patterns::R_PENTOMINO.cells_at(30, 30).expect("offset fits in usize");
    let read = Grid::with_live_cells(64, 64, Boundary::Bounded, &seed).expect("pattern fits a 64x64 grid");

    for kind in [ComputeBackendType::Sequential, ComputeBackendType::Cpu, ComputeBackendType::Gpu] {
        let mut config = LifeConfig::default();
        config.compute.backend = kind;
        let mut backend = match create_backend(&config) {
            Ok(backend) => backend,
            Err(e) => {
                println!("{:?}: unavailable ({})", kind, e);
                continue;
            }
        };
        let mut write = Grid::new(64, 64, Boundary::Bounded).expect("64x64 is a valid grid");
        match backend.step(&read, &mut write) {
            Ok(()) => println!(
                "{}: population {} -> {} in {}us",
                backend.name(),
                read.population(),
                write.population(),
                backend.stats().compute_time_us
            ),
            Err(e) => println!("{}: step failed ({})", backend.name(), e),
        }
    }
}
