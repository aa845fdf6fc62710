/// Demo application entry point
/// Handles window creation, input, and the render loop
use glam::Vec3;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
use anyhow::Context as _;
use raster_engine::perf::PerfStats;
use raster_engine::scene::load_obj;
use raster_engine::*;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const BACKGROUND_COLOR: u32 = 0xFF181820;

/// Model spin in radians per second, per axis.
const SPIN_RATE: Vec3 = Vec3::new(0.35, 0.6, 0.0);

fn main() -> anyhow::Result<()> {
    println!("=== Raster Engine - CPU Triangle Renderer ===");
    println!("Controls:");
    println!("  WASD - Move camera");
    println!("  Space/Shift - Up/Down");
    println!("  Mouse - Look around (click to capture)");
    println!("  1/2/3 - Wireframe / filled / textured");
    println!("  P - Switch edge precision (float / 24.8 fixed point)");
    println!("  B - Toggle backface culling");
    println!("  L - Toggle lighting");
    println!("  C - Print pipeline counters");
    println!("  ESC - Release mouse / exit");
    println!();

    let (mut mesh, texture) = load_scene()?;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Raster Engine")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );

    // Initialize software rendering context
    let context = softbuffer::Context::new(window.clone())
        .map_err(|e| anyhow::anyhow!("create render context: {e}"))?;
    let mut surface = softbuffer::Surface::new(&context, window.clone())
        .map_err(|e| anyhow::anyhow!("create render surface: {e}"))?;

    let window_size = window.inner_size();
    let mut framebuffer =
        Framebuffer::new(window_size.width as usize, window_size.height as usize);
    let mut depth_buffer =
        DepthBuffer::new(window_size.width as usize, window_size.height as usize);

    // Initialize camera looking at the model from a short distance
    let aspect_ratio = window_size.width as f32 / window_size.height as f32;
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, -4.0), aspect_ratio);
    let mut camera_controller = CameraController::new();

    // Initialize rasterizer and light
    let mut rasterizer = Rasterizer::new();
    let light = DirectionalLight::default();

    // Timing
    let mut last_frame = Instant::now();
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut stats = PerfStats::new();

    // Mouse state
    let mut mouse_captured = false;
    let mut last_mouse_pos: Option<(f64, f64)> = None;

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    // Minimized windows report a zero size; keep the old targets
                    if new_size.width > 0 && new_size.height > 0 {
                        framebuffer.resize(new_size.width as usize, new_size.height as usize);
                        depth_buffer.resize(new_size.width as usize, new_size.height as usize);
                        camera.set_aspect_ratio(new_size.width as f32 / new_size.height as f32);
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let pressed = event.state == ElementState::Pressed;

                    if let PhysicalKey::Code(keycode) = event.physical_key {
                        match keycode {
                            KeyCode::KeyW => camera_controller.forward_pressed = pressed,
                            KeyCode::KeyS => camera_controller.backward_pressed = pressed,
                            KeyCode::KeyA => camera_controller.left_pressed = pressed,
                            KeyCode::KeyD => camera_controller.right_pressed = pressed,
                            KeyCode::Space => camera_controller.up_pressed = pressed,
                            KeyCode::ShiftLeft => camera_controller.down_pressed = pressed,
                            KeyCode::Digit1 if pressed => {
                                rasterizer.mode = RenderMode::Wireframe;
                                println!("Draw mode: wireframe");
                            }
                            KeyCode::Digit2 if pressed => {
                                rasterizer.mode = RenderMode::Filled;
                                println!("Draw mode: filled");
                            }
                            KeyCode::Digit3 if pressed => {
                                rasterizer.mode = RenderMode::Textured;
                                println!("Draw mode: textured");
                            }
                            // Switch between the two edge arithmetic strategies
                            KeyCode::KeyP if pressed => {
                                rasterizer.precision = match rasterizer.precision {
                                    EdgePrecision::Float => EdgePrecision::Fixed,
                                    EdgePrecision::Fixed => EdgePrecision::Float,
                                };
                                println!(
                                    "Edge precision: {}",
                                    match rasterizer.precision {
                                        EdgePrecision::Float => "floating point",
                                        EdgePrecision::Fixed => "24.8 fixed point",
                                    }
                                );
                            }
                            KeyCode::KeyB if pressed => {
                                rasterizer.backface_culling = !rasterizer.backface_culling;
                                println!(
                                    "Backface culling: {}",
                                    if rasterizer.backface_culling {
                                        "ON"
                                    } else {
                                        "OFF"
                                    }
                                );
                            }
                            KeyCode::KeyL if pressed => {
                                rasterizer.enable_lighting = !rasterizer.enable_lighting;
                                println!(
                                    "Lighting: {}",
                                    if rasterizer.enable_lighting {
                                        "ON"
                                    } else {
                                        "OFF (full intensity)"
                                    }
                                );
                            }
                            // Counters stay at zero unless built with --features profiling
                            KeyCode::KeyC if pressed => {
                                FUNCTION_COUNTERS.snapshot().print_report();
                            }
                            KeyCode::Escape if pressed => {
                                if mouse_captured {
                                    mouse_captured = false;
                                    let _ = window.set_cursor_visible(true);
                                } else {
                                    elwt.exit();
                                }
                            }
                            _ => {}
                        }
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if button == MouseButton::Left && state == ElementState::Pressed {
                        mouse_captured = true;
                        let _ = window.set_cursor_visible(false);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if mouse_captured {
                        if let Some(last_pos) = last_mouse_pos {
                            let delta_x = position.x - last_pos.0;
                            let delta_y = position.y - last_pos.1;
                            camera.rotate(delta_x as f32, delta_y as f32);
                        }
                    }
                    last_mouse_pos = Some((position.x, position.y));
                }
                WindowEvent::RedrawRequested => {
                    if framebuffer.width == 0 || framebuffer.height == 0 {
                        return;
                    }

                    // Calculate delta time
                    let frame_start = Instant::now();
                    let dt = (frame_start - last_frame).as_secs_f32();
                    last_frame = frame_start;

                    // Update camera and spin the model
                    camera_controller.update_camera(&mut camera, dt);
                    mesh.add_rotation(SPIN_RATE * dt);
                    let update_done = Instant::now();

                    // Render frame
                    framebuffer.clear(BACKGROUND_COLOR);
                    depth_buffer.clear();
                    rasterizer.render_mesh(
                        &mesh,
                        &texture,
                        &camera,
                        &light,
                        &mut framebuffer,
                        &mut depth_buffer,
                    );
                    let render_done = Instant::now();

                    // Copy framebuffer to window
                    surface
                        .resize(
                            NonZeroU32::new(framebuffer.width as u32).unwrap(),
                            NonZeroU32::new(framebuffer.height as u32).unwrap(),
                        )
                        .unwrap();

                    let mut buffer = surface.buffer_mut().unwrap();
                    buffer.copy_from_slice(framebuffer.color_buffer_slice());
                    buffer.present().unwrap();
                    let present_done = Instant::now();

                    stats.update_us += (update_done - frame_start).as_secs_f64() * 1_000_000.0;
                    stats.render_us += (render_done - update_done).as_secs_f64() * 1_000_000.0;
                    stats.present_us += (present_done - render_done).as_secs_f64() * 1_000_000.0;
                    stats.total_us += (present_done - frame_start).as_secs_f64() * 1_000_000.0;
                    stats.frames += 1;

                    // FPS counter
                    frame_count += 1;
                    if fps_timer.elapsed().as_secs() >= 1 {
                        println!("FPS: {} | {} faces", frame_count, mesh.face_count());
                        frame_count = 0;
                        fps_timer = Instant::now();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                if stats.frames > 0 {
                    stats.print_summary();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

/// Build the demo scene: an OBJ model given on the command line (with an
/// optional texture image as the second argument), or the built-in cube.
fn load_scene() -> anyhow::Result<(Mesh, Texture)> {
    let mut args = std::env::args().skip(1);

    let mesh = match args.next() {
        Some(path) => {
            let mesh = load_obj(&path).with_context(|| format!("load model {}", path))?;
            println!("Loaded {} ({} faces)", path, mesh.face_count());
            mesh
        }
        None => Mesh::cube(),
    };

    let texture = match args.next() {
        Some(path) => {
            let texture =
                Texture::load(&path).with_context(|| format!("load texture {}", path))?;
            let (width, height) = texture.size();
            println!("Loaded {} ({}x{})", path, width, height);
            texture
        }
        None => Texture::checkerboard(64, 64, 8, 0xFFE8E8E8, 0xFF505058),
    };

    Ok((mesh, texture))
}
