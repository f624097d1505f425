use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, MouseMode, ScaleMode, Window, WindowOptions};

use portalcast::assets;
use portalcast::input::{Buttons, InputSnapshot};
use portalcast::renderer::{SCR_H, SCR_W, Software};
use portalcast::sim::{SIM_FPS, TicRunner};
use portalcast::world::{TextureBank, World};

/// Software-rendered portal engine.
#[derive(Parser)]
#[command(name = "play")]
struct Args {
    /// Level file to load
    level: PathBuf,

    /// Pass the literal word `fullscreen` for a borderless stretched window
    mode: Option<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(-1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let fullscreen = args.mode.as_deref() == Some("fullscreen");

    /* assets first: a broken table should fail before the window opens */
    let mut bank = TextureBank::new();
    assets::load_textures(&mut bank).context("loading texture table")?;
    let sky = assets::load_sky(&mut bank).context("loading skybox")?;

    println!("Loading level {}", args.level.display());
    let mut world = World::load(&args.level)
        .with_context(|| format!("loading {}", args.level.display()))?;

    let mut renderer = Software::new(SCR_W, SCR_H);
    renderer.sky = sky;

    let opts = if fullscreen {
        WindowOptions {
            borderless: true,
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        }
    } else {
        WindowOptions::default()
    };
    let mut window = Window::new("portalcast", SCR_W, SCR_H, opts)?;
    window.set_target_fps(SIM_FPS as usize);

    let mut ticker = TicRunner::new();
    let mut mouselook = true;
    let mut last_mouse: Option<(f32, f32)> = None;

    // ────────────────── benchmarking state ─────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* ---------------- one input snapshot per frame ------------- */
        let mut buttons = Buttons::empty();
        if window.is_key_down(Key::W) || window.is_key_down(Key::Up) {
            buttons |= Buttons::FORWARD;
        }
        if window.is_key_down(Key::S) || window.is_key_down(Key::Down) {
            buttons |= Buttons::BACK;
        }
        if window.is_key_down(Key::A) {
            buttons |= Buttons::STRAFE_LEFT;
        }
        if window.is_key_down(Key::D) {
            buttons |= Buttons::STRAFE_RIGHT;
        }
        if window.is_key_down(Key::Left) {
            buttons |= Buttons::LOOK_LEFT;
        }
        if window.is_key_down(Key::Right) {
            buttons |= Buttons::LOOK_RIGHT;
        }
        if window.is_key_down(Key::Space) {
            buttons |= Buttons::JUMP;
        }
        if window.is_key_down(Key::C) {
            buttons |= Buttons::CROUCH;
        }
        if window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift) {
            buttons |= Buttons::SPRINT;
        }
        if window.is_key_down(Key::Q) {
            buttons |= Buttons::QUIT;
        }
        if window.is_key_pressed(Key::M, KeyRepeat::No) {
            buttons |= Buttons::TOGGLE_MOUSELOOK;
        }
        if window.is_key_pressed(Key::F, KeyRepeat::No) {
            buttons |= Buttons::TOGGLE_FULLSCREEN;
        }

        if buttons.contains(Buttons::QUIT) {
            break;
        }
        if buttons.contains(Buttons::TOGGLE_MOUSELOOK) {
            mouselook = !mouselook;
            last_mouse = None;
        }

        let mut snap = InputSnapshot {
            buttons,
            ..Default::default()
        };

        // minifb reports absolute positions; synthesize relative deltas.
        if let Some(pos) = window.get_mouse_pos(MouseMode::Pass) {
            if mouselook {
                if let Some(last) = last_mouse {
                    snap.mouse_dx = (pos.0 - last.0) as f64;
                    snap.mouse_dy = (pos.1 - last.1) as f64;
                }
            }
            last_mouse = Some(pos);
        }

        /* ---------------- simulate, render, blit ------------------- */
        ticker.pump(&mut world, &snap);
        renderer.draw_world(&world, &bank);

        acc_time += t0.elapsed();
        acc_frames += 1;
        window.update_with_buffer(renderer.frame(), SCR_W, SCR_H)?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            println!("avg frame: {avg_ms:.2} ms  ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
