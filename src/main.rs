use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use rasterpipe::export::{save_color_png, save_depth_png};
use rasterpipe::logging::{init_logging, LoggingConfig};
use rasterpipe::{load_scene, DepthCompare, DepthConvention, Pipeline, Scene};

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

fn create_clap_command() -> Command {
    Command::new("rasterpipe")
        .about("CPU software rasterizer with a reversed-Z depth buffer")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .subcommand(
            Command::new("render")
                .about("Render a scene to PNG files")
                .arg(
                    Arg::new("scene")
                        .short('s')
                        .long("scene")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("RON scene file. If not supplied, a red unit quad is rendered."),
                )
                .arg(
                    Arg::new("color")
                        .short('c')
                        .long("color")
                        .value_name("OUT")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("color.png")
                        .help("Where to write the color buffer"),
                )
                .arg(
                    Arg::new("depth")
                        .short('d')
                        .long("depth")
                        .value_name("OUT")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the depth buffer as grayscale"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_name("W")
                        .value_parser(value_parser!(u32))
                        .conflicts_with("scene")
                        .help("Width of the built-in scene"),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .value_name("H")
                        .value_parser(value_parser!(u32))
                        .conflicts_with("scene")
                        .help("Height of the built-in scene"),
                )
                .arg(
                    Arg::new("standard-z")
                        .long("standard-z")
                        .action(ArgAction::SetTrue)
                        .help("Use standard depth (near 0, far 1) with a less-than test"),
                )
                .arg(
                    Arg::new("parallel")
                        .short('p')
                        .long("parallel")
                        .action(ArgAction::SetTrue)
                        .help("Rasterize models on the rayon thread pool"),
                )
                .arg(
                    Arg::new("log")
                        .long("log")
                        .value_name("FILTER")
                        .help("Log filter, e.g. 'debug' or 'rasterpipe=trace'. Defaults to RUST_LOG."),
                ),
        )
}

fn render(matches: &ArgMatches) -> Result<()> {
    let mut scene = match matches.get_one::<PathBuf>("scene") {
        Some(path) => load_scene(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            let width = matches.get_one::<u32>("width").copied().unwrap_or(DEFAULT_WIDTH);
            let height = matches.get_one::<u32>("height").copied().unwrap_or(DEFAULT_HEIGHT);
            Scene::unit_quad_demo(width, height)
        }
    };

    if matches.get_flag("standard-z") {
        scene.config = scene
            .config
            .with_depth_convention(DepthConvention::Standard)
            .with_depth_compare(DepthCompare::for_convention(DepthConvention::Standard));
    }
    if matches.get_flag("parallel") {
        scene.config = scene.config.with_parallel(true);
    }

    log::info!(
        "rendering {} models at {}x{} ({} depth, {:?} test{})",
        scene.models.len(),
        scene.config.width,
        scene.config.height,
        scene.config.depth_convention,
        scene.config.depth_compare,
        if scene.config.parallel { ", parallel" } else { "" }
    );

    let pipeline = Pipeline::new(scene.config).context("invalid render configuration")?;

    let start = Instant::now();
    let (framebuffer, stats) = pipeline
        .draw_with_stats(&scene.camera, &scene.models)
        .context("render pass failed")?;
    log::info!("Time spent: {:.3} s", start.elapsed().as_secs_f64());
    log::info!(
        "{} triangles, {} fragments, {} merged",
        stats.triangles,
        stats.fragments,
        stats.fragments_merged
    );

    if let Some(path) = matches.get_one::<PathBuf>("color") {
        save_color_png(&framebuffer, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }
    if let Some(path) = matches.get_one::<PathBuf>("depth") {
        save_depth_png(&framebuffer, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let matches = create_clap_command().get_matches();

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            init_logging(LoggingConfig {
                env_filter: sub_matches.get_one::<String>("log").cloned(),
                ..LoggingConfig::default()
            });
            render(sub_matches)
        }
        _ => unreachable!("subcommand is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_consistent() {
        create_clap_command().debug_assert();
    }

    #[test]
    fn width_conflicts_with_scene() {
        let result = create_clap_command().try_get_matches_from([
            "rasterpipe", "render", "--scene", "a.ron", "--width", "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn render_defaults() {
        let matches = create_clap_command()
            .try_get_matches_from(["rasterpipe", "render"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<PathBuf>("color"), Some(&PathBuf::from("color.png")));
        assert!(sub.get_one::<PathBuf>("depth").is_none());
        assert!(!sub.get_flag("parallel"));
    }
}
