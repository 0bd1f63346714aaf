//! Sculpture - An ADSR envelope as a spiral sculpture and a tone

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sculpture::config::{self, SculptureConfig, EXAMPLE_CONFIG};
use sculpture::controls::{Playback, SLIDERS};
use sculpture::engine::{default_device_name, list_output_devices, render_to_wav, Engine, Player};
use sculpture::envelope::EnvelopeParameters;
use sculpture::mapping::AudioSettings;
use sculpture::sculpture::{SceneStats, Sculpture};
use sculpture::viz::{self, App};

mod cli;

use cli::{Cli, Commands, EnvelopeArgs};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config: config_path,
            headless,
            envelope,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let sculpture = build_sculpture(&cfg, &envelope);
            let engine = Arc::new(Mutex::new(Engine::new(&cfg, sculpture.audio_settings())));
            let player = Player::open(engine.clone(), cfg.audio.device.as_deref(), cfg.audio.buffer_size);

            if headless {
                play_headless(sculpture, engine, player?)?;
            } else {
                viz::run(App::new(sculpture, engine, player))?;
            }
        }

        Commands::Record {
            config: config_path,
            output,
            duration,
            envelope,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let params = envelope.apply(cfg.envelope);
            let settings = cfg.sound.map(&params, Playback::Playing);
            print_params(&params);

            println!("Recording {} seconds to {:?}...", duration, output);
            let mut engine = Engine::new(&cfg, &settings);
            let summary = render_to_wav(&mut engine, &output, duration, cfg.audio.bit_depth, |done| {
                print!("\r  Progress: {}s / {}s", done, duration.ceil());
                std::io::stdout().flush().ok();
            })?;

            println!(
                "\nRecorded {:.2}s ({} frames, peak {:.3}) to {:?}",
                summary.duration_secs, summary.frames, summary.peak, output
            );
        }

        Commands::Export {
            config: config_path,
            output,
            envelope,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let sculpture = build_sculpture(&cfg, &envelope);
            export_obj(&sculpture, &output)?;

            let stats = sculpture.stats();
            println!(
                "Exported {} objects ({} triangles) to {:?}",
                stats.objects, stats.triangles, output
            );
        }

        Commands::Inspect {
            config: config_path,
            json,
            playing,
            envelope,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let mut sculpture = build_sculpture(&cfg, &envelope);
            if playing {
                sculpture.toggle_playback();
            }

            let report = Report::new(&sculpture);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }

        Commands::Devices => {
            println!("Available audio devices:\n");

            if let Some(name) = default_device_name() {
                println!("Default output: {}\n", name);
            }

            println!("Output devices:");
            match list_output_devices() {
                Ok(devices) => {
                    for (name, sample_rate, channels) in devices {
                        println!("  - {} ({} Hz, {} ch)", name, sample_rate, channels);
                    }
                }
                Err(e) => {
                    println!("  Error listing devices: {}", e);
                }
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Buffer size: {}", cfg.audio.buffer_size);
                    println!("  Device: {}", cfg.audio.device.as_deref().unwrap_or("(default)"));
                    println!("  Bit depth: {:?}", cfg.audio.bit_depth);
                    println!("  Master volume: {:.0}%", cfg.master.volume * 100.0);
                    print_params(&cfg.envelope);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let path = "sculpture.yaml";
            if Path::new(path).exists() {
                println!("sculpture.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, EXAMPLE_CONFIG)?;
                println!("Created sculpture.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

fn build_sculpture(cfg: &SculptureConfig, envelope: &EnvelopeArgs) -> Sculpture {
    Sculpture::new(envelope.apply(cfg.envelope), cfg.sound)
}

fn play_headless(mut sculpture: Sculpture, engine: Arc<Mutex<Engine>>, mut player: Player) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    sculpture.toggle_playback();
    if let Ok(mut eng) = engine.lock() {
        eng.apply(sculpture.audio_settings());
        eng.start();
    }

    let audio = sculpture.audio_settings();
    print_params(&sculpture.params());
    println!(
        "Playing {} at {:.1} Hz on '{}'. Press Ctrl-C to stop.",
        audio.waveform,
        audio.frequency,
        player.device_name()
    );

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    if let Ok(mut eng) = engine.lock() {
        eng.stop();
    }
    player.close();
    info!("playback stopped");
    Ok(())
}

fn export_obj(sculpture: &Sculpture, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
    let mut out = BufWriter::new(file);
    sculpture
        .model()
        .write_obj(&mut out)
        .with_context(|| format!("failed to write {:?}", path))?;
    out.flush().with_context(|| format!("failed to write {:?}", path))?;
    info!("wrote {:?}", path);
    Ok(())
}

fn print_params(params: &EnvelopeParameters) {
    println!("  Envelope:");
    for slider in &SLIDERS {
        println!("    {:<8} {}", slider.label, slider.format(slider.value(params)));
    }
}

/// Everything derived from one parameter set
#[derive(Serialize)]
struct Report {
    params: EnvelopeParameters,
    playback: Playback,
    audio: AudioSettings,
    base_radius: f64,
    max_height: f64,
    spiral_turns: f64,
    details: Vec<&'static str>,
    stats: SceneStats,
}

impl Report {
    fn new(sculpture: &Sculpture) -> Self {
        let curve = sculpture.curve();
        Self {
            params: sculpture.params(),
            playback: sculpture.playback(),
            audio: *sculpture.audio_settings(),
            base_radius: curve.base_radius,
            max_height: curve.max_height,
            spiral_turns: curve.spiral_turns,
            details: sculpture.details().iter().map(|d| d.name()).collect(),
            stats: sculpture.stats(),
        }
    }

    fn print(&self) {
        print_params(&self.params);
        println!("  Geometry:");
        println!("    Base radius   {:.3}", self.base_radius);
        println!("    Height        {:.3}", self.max_height);
        println!("    Spiral turns  {:.3}", self.spiral_turns);
        println!("    Objects       {}", self.stats.objects);
        println!("    Triangles     {}", self.stats.triangles);
        println!("  Audio ({}):", self.playback);
        println!("    Frequency     {:.1} Hz", self.audio.frequency);
        println!("    Waveform      {}", self.audio.waveform);
        println!("    Detune        {:.0} cents", self.audio.detune_cents);
        println!("    Gain          {:.3}", self.audio.gain);
    }
}
