//! Lumen desktop entry point.
//!
//! Usage: `lumen [URL]`. The first argument with a recognized scheme
//! (`http://`, `https://`, `file://`, `about:`) is opened; anything else is
//! ignored and the browser starts at `about:home`.
//!
//! `LUMEN_CONFIG` may name a TOML file overriding the default settings.
//!
//! With the default `sdl` feature the page opens in a window. Built without
//! it, the page is rendered offscreen, the host key codes listed in
//! `LUMEN_KEYS` are replayed, and the final title is printed.

#[cfg_attr(feature = "sdl", allow(dead_code))]
mod headless;

use anyhow::{Context, Result};

use lumen_browser::{Browser, BrowserConfig, Loader, url};
use lumen_net::{RustlsTlsProvider, StdNetworkBackend};
use lumen_types::bitmap_font::BitmapTextMetrics;
use lumen_vfs::StdVfs;

/// Environment variable naming a TOML configuration file.
const CONFIG_ENV: &str = "LUMEN_CONFIG";

/// Environment variable holding the headless key script.
#[cfg(not(feature = "sdl"))]
const KEYS_ENV: &str = "LUMEN_KEYS";

/// Load the configuration from `path`, or the defaults when unset.
fn load_config(path: Option<&str>) -> Result<BrowserConfig> {
    let Some(path) = path else {
        return Ok(BrowserConfig::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    let config =
        BrowserConfig::from_toml_str(&text).with_context(|| format!("invalid config {path}"))?;
    log::info!("Loaded config from {path}");
    Ok(config)
}

/// Pick the start URL from the command-line arguments.
fn start_url(args: impl IntoIterator<Item = String>, home: &str) -> String {
    args.into_iter()
        .find(|arg| url::has_scheme(arg))
        .unwrap_or_else(|| home.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var(CONFIG_ENV).ok();
    let config = load_config(config_path.as_deref())?;
    config.validate()?;
    let start = start_url(std::env::args().skip(1), &config.home_url);
    log::info!(
        "Starting Lumen ({}x{}) at {start}",
        config.window_width,
        config.window_height,
    );

    let loader = Loader::new(
        Box::new(StdVfs::new()),
        Box::new(StdNetworkBackend::new()),
        config.fetch.clone(),
    )
    .with_tls(Box::new(RustlsTlsProvider::new()));
    let metrics = Box::new(BitmapTextMetrics::new());

    #[cfg(feature = "sdl")]
    {
        let viewport = lumen_backend_sdl::SdlViewport::new(
            "Lumen",
            config.window_width,
            config.window_height,
        )?;
        Browser::new(viewport, loader, metrics, config).run(&start);
    }

    #[cfg(not(feature = "sdl"))]
    {
        let script = match std::env::var(KEYS_ENV) {
            Ok(codes) => headless::parse_key_script(&codes)?,
            Err(_) => Vec::new(),
        };
        let viewport = headless::HeadlessViewport::new(config.window_width, config.window_height)
            .with_events(script);
        let viewport = Browser::new(viewport, loader, metrics, config).run(&start);
        println!("{}", viewport.title());
    }

    log::info!("Lumen shut down");
    Ok(())
}
