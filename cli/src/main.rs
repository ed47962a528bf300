use clap::Parser;
use drivesim::core::handle_drive::{handle_drive, DriveSetup};
use drivesim::post::drive_result::DriveResult;
use drivesim::pre::demo_path::demo_path;
use drivesim::pre::read_sim_pars::{load_sim_pars, SimPars};
use drivesim::pre::sim_opts::SimOpts;
use gui::core::chart_export::{chart_file_path, export_speed_chart};
use gui::core::gui::DrivePlot;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    // RUST_LOG takes precedence over the debug flag
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_headless(sim_opts: &SimOpts, sim_pars: &SimPars) -> anyhow::Result<()> {
    let canvas = sim_pars.canvas_spec();
    let path = demo_path(&canvas, sim_opts.seed)?;
    info!(
        "Generated demo path with {} points ({:.1} px) from seed {}",
        path.len(),
        path.length(),
        sim_opts.seed
    );

    let engine_pars = sim_pars.engine_pars();
    let t_start = Instant::now();

    // drives are independent of each other
    let drive_results: Vec<anyhow::Result<DriveResult>> = sim_opts
        .demo_speeds
        .par_iter()
        .map(|&target_speed| {
            let setup = DriveSetup {
                target_speed,
                tick_period: sim_pars.tick_period(),
                clock_period: sim_pars.clock_period(),
                max_ticks: sim_opts.max_ticks,
            };
            handle_drive(&engine_pars, &path, &setup)
        })
        .collect();

    info!("Execution time: {}ms", t_start.elapsed().as_millis());

    for drive_result in drive_results {
        let drive_result = drive_result?;
        drive_result.print_summary()?;

        let label = format!("speed_{}", drive_result.target_speed);
        let csv_path = sim_opts
            .output_dir
            .join(format!("speed_samples_{}.csv", drive_result.target_speed));
        match drive_result.write_speed_samples(&csv_path) {
            Ok(path) => info!("Speed samples saved to {}", path),
            Err(err) => warn!("Failed to save speed samples: {:#}", err),
        }

        let chart_path = chart_file_path(&sim_opts.output_dir, Some(&label));
        match export_speed_chart(&drive_result.run_metrics(), &chart_path) {
            Ok(path) => info!("Speed chart saved to {}", path),
            Err(err) => warn!("Failed to export the speed chart: {:#}", err),
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();
    init_logging(sim_opts.debug);

    // get simulation parameters
    let sim_pars = load_sim_pars(&sim_opts)?;
    info!(
        "Maximum speed {} px/tick, tick period {}ms, metrics {}",
        sim_pars.motion.speed_max,
        sim_pars.motion.tick_period_ms,
        if sim_pars.show_metrics { "shown" } else { "hidden" }
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if sim_opts.headless {
        info!("Running demo drives without GUI...");
        run_headless(&sim_opts, &sim_pars)?;
    } else {
        info!("Starting GUI...");
        let gui = DrivePlot::new(&sim_pars, &sim_opts.output_dir)?;

        let width = sim_pars.canvas.width
            + if sim_pars.show_metrics {
                sim_pars.chart.width + 60.0
            } else {
                0.0
            }
            + 40.0;
        let height = (sim_pars.canvas.height + 160.0).max(sim_pars.chart.height + 260.0);

        let native_options = eframe::NativeOptions {
            initial_window_size: Some(eframe::egui::Vec2::new(width as f32, height as f32)),
            ..eframe::NativeOptions::default()
        };
        eframe::run_native(Box::new(gui), native_options);
    }

    Ok(())
}
