mod cli;

use dvdforged::{config, project, report};
use dvdforged_common::paths::{vmg_bup_path, vmg_ifo_path};
use dvdforged_ifo::scan::discover_titlesets;
use dvdforged_ifo::{
    generate_vmgm, scan_ifo, ColorArena, MenuGroup, RawCommandCompiler, TocGenerator,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "dvdforged=trace,dvdforged_ifo=trace,dvdforged_common=debug".to_string()
        } else {
            "dvdforged=info,dvdforged_ifo=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Toc { dir, menus, json } => {
            create_toc(&dir, menus.as_deref(), cli.config.as_deref(), json)
        }
        Commands::Scan { path, json } => scan_path(&path, json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("dvdforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn create_toc(
    dir: &Path,
    menus_path: Option<&Path>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    // The disc tree is never created here, it must already hold titlesets.
    if !dir.is_dir() {
        anyhow::bail!(
            "Disc directory does not exist: {:?} (it must already contain VIDEO_TS titlesets)",
            dir
        );
    }

    let (mut menus, mut colors) = match menus_path {
        Some(path) => project::load_project(path)?
            .into_model()
            .with_context(|| format!("Invalid menu project: {:?}", path))?,
        None => (MenuGroup::new(), ColorArena::new()),
    };

    let compiler = RawCommandCompiler;
    let generator = TocGenerator::new(config.output.toc_options(), &compiler);
    let generated = generate_vmgm(dir, &mut menus, None, &mut colors, &generator)
        .with_context(|| format!("Failed to create table of contents in {:?}", dir))?;

    let summary = report::TocReport {
        ifo: vmg_ifo_path(dir),
        backup: vmg_bup_path(dir),
        titlesets: generated.titlesets.len(),
        titles: generated.titlesets.total_titles(),
        layout: generated.layout,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Wrote {}", summary.ifo.display());
        println!("Wrote {}", summary.backup.display());
        println!("Titlesets: {}", summary.titlesets);
        println!("Titles: {}", summary.titles);
        println!("IFO sectors: {}", summary.layout.ifo_sectors);
        if summary.layout.menu_vob_sectors > 0 {
            println!("Menu VOB sectors: {}", summary.layout.menu_vob_sectors);
        }
        println!("First titleset sector: {}", summary.layout.vts_start);
    }

    Ok(())
}

fn scan_path(path: &Path, json: bool) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {:?}", path);
    }

    let files = if path.is_dir() {
        discover_titlesets(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        let vts = scan_ifo(file)?;
        reports.push(report::TitlesetReport::new(file, &vts));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for r in &reports {
        println!("File: {}", r.file.display());
        println!("  Sectors: {}", r.num_sectors);
        println!("  Menu: {}", if r.has_menu { "yes" } else { "no" });
        println!("  Titles: {}", r.titles);
        for (i, chapters) in r.chapters.iter().enumerate() {
            println!("    [{}] {} chapters", i + 1, chapters);
        }
        println!("  Category: {}", r.category);
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Provider id: {}", config.output.provider_id);
    println!("  Video format: {:?}", config.output.video_format);

    Ok(())
}
