//! Example: Load and render an STL file in the terminal
//!
//! Usage: cargo run --example load_stl -- path/to/file.stl

use std::env;
use std::fs;
use rast3d_core::{stl, Mesh, RenderError};
use rast3d_terminal::{AppError, TerminalApp};

fn main() -> Result<(), AppError> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <stl-file>", args[0]);
        eprintln!("\nNo STL file provided, using default cube...");
        let cube = Mesh::cube(2.0);
        let mut app = TerminalApp::new(cube)?;
        return app.run();
    }

    let stl_path = &args[1];

    println!("Loading STL file: {stl_path}");

    let data = fs::read(stl_path)?;
    let mesh = stl::parse_stl(&data).map_err(RenderError::from)?;

    println!("Loaded {} faces", mesh.face_count());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(mesh)?;
    app.run()?;

    Ok(())
}
