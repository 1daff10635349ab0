//! Terminal front end for the rast3d software rasterizer.
//!
//! Owns the camera, model rotation, and framebuffer, and drives the core's
//! `render_with` once per frame. Lighting stays out of the core: a simple
//! directional brightness is baked into per-vertex colors before each
//! submission, the way a scene preprocessor would.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::{Matrix4, Vector3};
use rast3d_core::{
    math, render_with, Camera, Color, Framebuffer, Mesh, RenderError, RotationState, Shading,
    Transform,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

pub mod renderer;

/// Errors from running the terminal app.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Base tint for meshes that carry no vertex colors of their own.
const BASE_COLOR: Color = Color::new(0.55, 0.85, 1.0);

/// Main application struct for terminal 3D rendering.
pub struct TerminalApp {
    mesh: Mesh,
    rotation: RotationState,
    camera: Camera,
    framebuffer: Framebuffer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh) -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            mesh,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera: Camera::new(width as u32, height as u32),
            framebuffer: Framebuffer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Update
            self.update();

            // Render
            self.render_frame()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                debug!(fps = self.fps, "frame rate");
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> Result<(), AppError> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    self.rotation.rotate(0.1, 0.0, 0.0);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    self.rotation.rotate(-0.1, 0.0, 0.0);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.rotation.rotate(0.0, -0.1, 0.0);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.rotation.rotate(0.0, 0.1, 0.0);
                }
                KeyCode::Char('e') => {
                    self.rotation.rotate(0.0, 0.0, 0.1);
                }
                KeyCode::Char('r') => {
                    self.rotation.rotate(0.0, 0.0, -0.1);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        self.rotation.rotate(0.01, 0.015, 0.0);
    }

    fn render_frame(&mut self) -> Result<(), AppError> {
        let model = Transform::rotation_matrix(&self.rotation);
        let lit = bake_lighting(&self.mesh, &model, BASE_COLOR);

        self.framebuffer.clear();
        render_with(
            &lit,
            &self.camera,
            &model,
            Shading::VertexColor,
            &mut self.framebuffer,
        )?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        renderer::blit(&self.framebuffer, &mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "Rast3D Terminal | FPS: {:.1} | Controls: WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Bake a directional brightness into per-vertex colors.
///
/// Normals are transformed with the model's inverse-transpose so non-uniform
/// model scaling stays correct. Vertices without a normal render fully lit;
/// vertices with their own color keep it as the tint.
pub fn bake_lighting(mesh: &Mesh, model: &Matrix4<f32>, base: Color) -> Mesh {
    let light = Vector3::new(0.0, 0.0, 1.0);
    let normal_transform = math::normal_matrix(model);

    let vertices = mesh
        .vertices
        .iter()
        .map(|vertex| {
            let brightness = match (vertex.normal, normal_transform) {
                (Some(normal), Some(transform)) => math::try_direction(transform * normal)
                    .map(|world| world.dot(&light).max(0.0))
                    .unwrap_or(0.0),
                _ => 1.0,
            };
            let tint = vertex.color.unwrap_or(base);
            vertex.with_color(tint.scale(brightness))
        })
        .collect();

    Mesh::from_parts(vertices, mesh.faces.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bake_lighting_scales_by_facing() {
        let mesh = Mesh::cube(2.0);
        let lit = bake_lighting(&mesh, &Matrix4::identity(), Color::WHITE);

        for (original, shaded) in mesh.vertices.iter().zip(lit.vertices.iter()) {
            let normal = original.normal.unwrap();
            let color = shaded.color.unwrap();
            if normal.z > 0.5 {
                // Facing the light head-on: full brightness.
                assert!((color.r - 1.0).abs() < 1e-6);
            } else {
                // Side and back faces of an axis-aligned cube get nothing
                // from a light along +z.
                assert!(color.r.abs() < 1e-6);
            }
        }
        assert_eq!(lit.faces, mesh.faces);
    }

    #[test]
    fn test_bake_lighting_without_normals_keeps_full_brightness() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(rast3d_core::Vertex::new(0.0, 0.0, 0.0));
        let lit = bake_lighting(&mesh, &Matrix4::identity(), Color::RED);
        assert_eq!(lit.vertices[0].color, Some(Color::RED));
    }
}
