use crate::cli::{Cli, Commands, CompileArgs};
use anyhow::{Context, Result};
use hlscmd::config::Config;
use hlscmd::engine::{
    self, AUDIO_BITRATE_MENU, AudioCodec, CompiledCommand, Compiler, Notice, RawOptions,
    Resolution, VideoCodec, VideoEncoder, video_bitrate_menu,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

/// Exit code for options that fail validation
const EXIT_INVALID_OPTIONS: i32 = 2;

pub fn run(cli: Cli) {
    let result = match cli.command {
        Commands::Compile(args) => handle_compile(&args, cli.config.as_deref()),
        Commands::Menus { resolution } => handle_menus(resolution.as_deref()),
        Commands::Encoders => {
            handle_encoders();
            Ok(())
        }
        Commands::InitConfig => handle_init_config(cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable config: {:#}", e);
            Config::default()
        })),
    }
}

/// Layer options: config defaults, then the options file, then flags
fn collect_options(args: &CompileArgs, config: &Config) -> Result<RawOptions> {
    let from_file = match &args.options {
        Some(path) => RawOptions::load(path)?,
        None => RawOptions::default(),
    };
    Ok(config.apply_defaults(from_file.merge(args.to_raw_options())))
}

#[derive(Serialize)]
struct CompileOutput<'a> {
    command: String,
    posix_command: String,
    compiled: &'a CompiledCommand,
    keyinfo_contents: Option<String>,
    notices: &'a [Notice],
}

fn handle_compile(args: &CompileArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let raw = collect_options(args, &config)?;

    let report = match engine::validate_report(&raw) {
        Ok(report) => report,
        Err(errors) => {
            if args.json {
                let body = serde_json::json!({ "errors": errors });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                eprintln!("Invalid options:");
                for error in &errors {
                    eprintln!("  - {}", error);
                }
            }
            process::exit(EXIT_INVALID_OPTIONS);
        }
    };

    let compiled = Compiler::new(config.tool.ffmpeg_path.as_str()).compile(&report.config);
    tracing::info!(
        playlist = compiled.output_playlist_path(),
        "compiled command for {}",
        report.config.input_path()
    );

    if args.json {
        let output = CompileOutput {
            command: compiled.render(),
            posix_command: compiled.render_posix(),
            compiled: &compiled,
            keyinfo_contents: compiled.keyinfo_contents(),
            notices: &report.notices,
        };
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
        return Ok(());
    }

    for notice in &report.notices {
        eprintln!("Note: {}", notice.message);
    }

    if args.posix {
        println!("{}", compiled.render_posix());
    } else {
        println!("{}", compiled.render());
    }

    if args.show_paths {
        println!();
        println!("Playlist:      {}", compiled.output_playlist_path());
        println!("Segments:      {}", compiled.segment_pattern());
        if let (Some(key), Some(info)) = (compiled.key_file_path(), compiled.key_info_file_path())
        {
            println!("Key file:      {}", key);
            println!("Key info file: {}", info);
        }
    }

    if args.keyinfo {
        println!();
        match (compiled.keyinfo_contents(), compiled.key_info_file_path()) {
            (Some(contents), Some(path)) => {
                println!("Contents for {}:", path);
                print!("{}", contents);
            }
            _ => println!("Encryption is disabled; no key info file is referenced."),
        }
    }

    Ok(())
}

fn handle_menus(resolution: Option<&str>) -> Result<()> {
    let resolutions = match resolution {
        Some(s) => vec![
            s.parse::<Resolution>()
                .map_err(|_| anyhow::anyhow!("Unknown resolution '{}'", s))?,
        ],
        None => Resolution::ALL.to_vec(),
    };

    println!("Video bitrates (default marked with *):");
    for res in resolutions {
        let menu = video_bitrate_menu(res);
        println!(
            "  {:<9} {:<10} {}",
            res.label(),
            res.size_arg().unwrap_or_else(|| "source".to_string()),
            format_menu(menu.options.iter().copied(), menu.default_bitrate())
        );
        println!("  {:<9} {:<10} {}", "", "", menu.hint);
    }

    if resolution.is_none() {
        println!();
        println!("Audio bitrates (aac only):");
        println!(
            "  {}",
            format_menu(
                AUDIO_BITRATE_MENU.options.iter().copied(),
                AUDIO_BITRATE_MENU.default_bitrate()
            )
        );
        println!("  {}", AUDIO_BITRATE_MENU.hint);
    }
    Ok(())
}

fn format_menu(
    options: impl Iterator<Item = engine::Bitrate>,
    default: engine::Bitrate,
) -> String {
    options
        .map(|b| {
            if b == default {
                format!("{}*", b)
            } else {
                b.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn handle_encoders() {
    println!("Video encoders:");
    println!(
        "  {:<18} {:<44} -",
        VideoCodec::Copy.ffmpeg_name(),
        "Stream copy (no re-encode, no size/bitrate)"
    );
    for encoder in VideoEncoder::ALL {
        println!(
            "  {:<18} {:<44} {}",
            encoder.ffmpeg_name(),
            encoder.display_name(),
            encoder.tuning_args().join(" ")
        );
    }

    println!();
    println!("Audio encoders:");
    for codec in AudioCodec::ALL {
        println!("  {:<18} {}", codec.ffmpeg_name(), codec.display_name());
    }
}

fn handle_init_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::config_path()?,
    };

    if path.exists() {
        let cfg = Config::load_from(&path)?;
        println!("Config loaded successfully from {}", path.display());
        println!("{:#?}", cfg);
    } else {
        println!("Config missing at {}", path.display());
        println!("Creating default config...");
        Config::default().save_to(&path)?;
        println!("Default config saved to {}", path.display());
    }
    Ok(())
}
