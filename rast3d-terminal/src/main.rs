//! Rast3D terminal demo - rotating cube
//!
//! Demonstrates the software rasterizer blitted to the terminal.
//! Controls:
//!   - WASD / Arrow Keys: Rotate the cube
//!   - E/R: Roll rotation
//!   - Q/ESC: Quit

use rast3d_core::Mesh;
use rast3d_terminal::{AppError, TerminalApp};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    // Diagnostics go to stderr so they don't tear the rendered frame.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Rast3D Terminal - Loading...");

    // Create a cube mesh
    let cube = Mesh::cube(2.0);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(cube)?;
    app.run()?;

    Ok(())
}
