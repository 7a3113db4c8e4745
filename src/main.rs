// src/main.rs
use clap::Parser;
use fontfall::probe::{parse_codepoint, parse_surface_size, probe_codepoints};
use fontfall::{
    system_platform, BackendChoice, ContentType, PlatformConfig, ProbeResult, SurfaceRequest,
    SystemCatalogConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Report which installed font covers each codepoint
#[derive(Parser)]
#[command(name = "fontfall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Codepoints: U+XXXX, 0xXXXX, a decimal number or a single character
    #[arg(value_parser = parse_codepoint, required_unless_present = "surface")]
    codepoints: Vec<u32>,

    /// Language group for the font list
    #[arg(long = "lang")]
    language: Option<String>,

    /// Font directory to scan instead of the platform defaults (repeatable)
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Ask fontconfig before scanning directories
    #[arg(long)]
    fontconfig: bool,

    /// Report the backend for an ARGB surface of this size (repeatable)
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    surface: Vec<(u32, u32)>,
}

fn run(cli: Cli) -> ProbeResult<()> {
    let mut catalog_config = SystemCatalogConfig::default().with_fontconfig(cli.fontconfig);
    if !cli.font_dirs.is_empty() {
        catalog_config = catalog_config.with_search_paths(cli.font_dirs);
    }

    let mut config = PlatformConfig::default();
    if let Some(language) = cli.language {
        config = config.with_default_language(&language);
    }

    let platform = system_platform(catalog_config, config)?;
    let style = platform.default_style();

    for report in probe_codepoints(&platform, &cli.codepoints, &style) {
        println!("{report}");
    }

    let format = platform.optimal_format_for_content(ContentType::ColorAlpha);
    for (width, height) in cli.surface {
        let request = SurfaceRequest::new(width, height, format);
        let footprint = platform.allocator().footprint(&request);
        let memory = match platform.allocator().allocate(&request) {
            BackendChoice::Lightweight => "heap",
            BackendChoice::Native => "system",
        };
        println!("{width}x{height}\t{footprint} bytes\t{memory}");
    }

    platform.shutdown();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fontfall: {e}");
            ExitCode::FAILURE
        }
    }
}
