use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use birthday_cake::app::CakeApp;
use birthday_cake::config::SceneConfig;
use birthday_cake::engine::window::SceneWindow;

#[derive(Parser)]
#[command(name = "birthday-cake", about = "Animated birthday cake scene")]
struct Args {
    /// Scene config (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the texture images
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Seed for particle placement and the sprite noise
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,
}

impl Args {
    fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)
                .with_context(|| format!("loading scene config {}", path.display()))?,
            None => SceneConfig::default(),
        };
        if let Some(dir) = &self.assets {
            config.assets.directory = dir.clone();
        }
        if self.seed.is_some() {
            config.sprites.seed = self.seed;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.scene_config()?;

    let sdl = sdl2::init()
        .map_err(anyhow::Error::msg)
        .context("initialising SDL2")?;
    let window = SceneWindow::new(&sdl, &config.window)?;

    let mut app = CakeApp::new(&config).context("setting up the scene")?;
    app.run(&sdl, &window)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "birthday-cake",
            "--assets",
            "textures",
            "--seed",
            "42",
            "--width",
            "640",
        ]);
        let config = args.scene_config().unwrap();
        assert_eq!(config.assets.directory, PathBuf::from("textures"));
        assert_eq!(config.sprites.seed, Some(42));
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 768);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["birthday-cake", "--config", "no/such/scene.toml"]);
        assert!(args.scene_config().is_err());
    }
}
