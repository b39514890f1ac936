//! softrender demo
//!
//! Renders a RON scene (or the built-in spinning sphere) with the 3D device
//! and presents the buffer through macroquad. `--2d` shows a canvas gallery
//! instead.
//!
//! Usage: softrender [scene.ron] [--2d]

use macroquad::prelude as mq;
use softrender::device::{Device2D, Device3D};
use softrender::rasterizer::{Color, Rect, Texture, Vec2};
use softrender::scene::{load_scene, SceneFile};
use softrender::VERSION;

fn window_conf() -> mq::Conf {
    mq::Conf {
        window_title: format!("softrender v{}", VERSION),
        window_width: 800,
        window_height: 600,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let gallery = args.iter().any(|a| a == "--2d");

    let scene = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => match load_scene(path) {
            Ok(scene) => {
                log::info!("Loaded scene {}", path);
                scene
            }
            Err(e) => {
                log::error!("Failed to load {}: {}, using the default scene", path, e);
                SceneFile::default()
            }
        },
        None => SceneFile::default(),
    };

    if gallery {
        run_gallery(&scene).await;
    } else {
        run_scene(&scene).await;
    }
}

async fn run_scene(scene: &SceneFile) {
    let mut meshes = match scene.build_meshes() {
        Ok(meshes) => meshes,
        Err(e) => {
            log::error!("Failed to build scene meshes: {}", e);
            return;
        }
    };
    let mut device = Device3D::new(scene.width, scene.height);

    loop {
        if mq::is_key_pressed(mq::KeyCode::Escape) {
            break;
        }

        for (mesh, desc) in meshes.iter_mut().zip(&scene.meshes) {
            mesh.rotation = mesh.rotation + desc.spin;
        }

        device.clear(scene.background);
        if let Err(e) = device.render(&scene.camera, &scene.light, &meshes) {
            log::error!("Render failed: {}", e);
            break;
        }

        present(&device.to_rgba(), device.width(), device.height());
        mq::next_frame().await;
    }
}

async fn run_gallery(scene: &SceneFile) {
    let mut device = Device2D::new(scene.width, scene.height);
    let checker = Texture::checkerboard(32, 32, Color::WHITE, Color::new(200, 60, 60));
    let mut angle = 0.0f32;

    loop {
        if mq::is_key_pressed(mq::KeyCode::Escape) {
            break;
        }
        angle += 0.02;

        device.clear(scene.background);
        device.load_identity();
        device.fill = true;
        device.stroke = true;
        device.line_width = 1;

        device.fill_color = Color::new(40, 90, 200);
        device.stroke_color = Color::WHITE;
        device.draw_rect(Vec2::new(10.0, 10.0), 80, 50);

        device.fill_color = Color::new(60, 180, 90);
        device.draw_triangle(Vec2::new(150.0, 10.0), Vec2::new(200.0, 70.0), Vec2::new(110.0, 60.0));

        device.fill_color = Color::new(220, 180, 40);
        device.draw_circle(Vec2::new(260.0, 40.0), 30);
        device.draw_ellipse(Vec2::new(340.0, 40.0), 40, 20);

        device.fill = false;
        device.stroke_color = Color::new(255, 120, 200);
        device.line_width = 2;
        device.draw_bezier(
            Vec2::new(10.0, 150.0),
            Vec2::new(60.0, 80.0),
            Vec2::new(120.0, 220.0),
            Vec2::new(180.0, 150.0),
        );
        device.draw_arc(Vec2::new(250.0, 150.0), 40.0, 0.0, angle % std::f32::consts::TAU);

        // Star outline recorded as a path and filled on end_path
        device.fill = true;
        device.line_width = 1;
        device.fill_color = Color::new(120, 60, 200);
        device.stroke_color = Color::WHITE;
        device.begin_path();
        for i in 0..5 {
            let a0 = i as f32 * 4.0 * std::f32::consts::PI / 5.0;
            let a1 = (i + 1) as f32 * 4.0 * std::f32::consts::PI / 5.0;
            device.draw_line(
                Vec2::new(350.0 + a0.sin() * 40.0, 150.0 - a0.cos() * 40.0),
                Vec2::new(350.0 + a1.sin() * 40.0, 150.0 - a1.cos() * 40.0),
            );
        }
        device.end_path();

        // Spinning blit, drawn under everything above
        device.push();
        device.translate(Vec2::new(80.0, 240.0));
        device.rotate(angle);
        device.z_layer = 1.0;
        if let Err(e) = device.draw_image(
            &checker,
            Rect::new(0.0, 0.0, 32, 32),
            Rect::new(-24.0, -24.0, 48, 48),
        ) {
            log::error!("Blit failed: {}", e);
        }
        device.z_layer = 0.0;
        device.pop();

        present(&device.to_rgba(), device.width(), device.height());
        mq::next_frame().await;
    }
}

/// Upload an RGBA buffer and draw it scaled to fit the window
fn present(rgba: &[u8], width: usize, height: usize) {
    mq::clear_background(mq::Color::from_rgba(30, 30, 35, 255));

    let texture = mq::Texture2D::from_rgba8(width as u16, height as u16, rgba);
    texture.set_filter(mq::FilterMode::Nearest);

    let screen_w = mq::screen_width();
    let screen_h = mq::screen_height();
    let scale = (screen_w / width as f32).min(screen_h / height as f32);
    let draw_w = width as f32 * scale;
    let draw_h = height as f32 * scale;

    mq::draw_texture_ex(
        &texture,
        (screen_w - draw_w) / 2.0,
        (screen_h - draw_h) / 2.0,
        mq::WHITE,
        mq::DrawTextureParams {
            dest_size: Some(mq::vec2(draw_w, draw_h)),
            ..Default::default()
        },
    );
}
