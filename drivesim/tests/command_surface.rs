use approx::assert_abs_diff_eq;
use drivesim::core::chart::ChartLayout;
use drivesim::core::engine::{EnginePars, MotionEngine, TickOutcome};
use drivesim::core::geometry::Point;
use drivesim::core::handle_drive::{handle_drive, DriveSetup};
use drivesim::core::render::{render_scene, CanvasSpec};
use drivesim::core::state::{SimPhase, DEFAULT_CAR_POSITION};
use drivesim::interfaces::gui_interface::RgbColor;
use drivesim::pre::demo_path::demo_path;
use std::time::{Duration, Instant};

#[test]
fn record_drive_reset_and_clear() {
    let t0 = Instant::now();
    let mut engine = MotionEngine::new(EnginePars {
        speed_max: 10.0,
        default_position: DEFAULT_CAR_POSITION,
    });

    // pointer down / drag / up
    assert!(engine.begin_path(Point::new(100.0, 100.0)));
    assert!(engine.extend_path(Point::new(130.0, 100.0)));
    assert!(engine.extend_path(Point::new(130.0, 140.0)));
    assert!(engine.end_path());
    assert_eq!(engine.phase(), SimPhase::Idle);

    // controls are disabled before the start
    assert!(!engine.can_accelerate());
    assert!(!engine.can_brake());

    assert!(engine.start(t0));
    assert!(!engine.begin_path(Point::new(0.0, 0.0)));

    for _ in 0..15 {
        engine.accelerate();
    }
    assert_eq!(engine.state().car.speed, 10.0);
    assert!(!engine.can_accelerate());

    let mut outcomes = vec![];
    for k in 1..=20u32 {
        let now = t0 + Duration::from_millis(50) * k;
        if k % 2 == 0 {
            engine.update_clock(now);
        }
        outcomes.push(engine.tick(now));
        if outcomes.last() == Some(&TickOutcome::Arrived) {
            break;
        }
    }

    // 30 px + 40 px at 10 px/tick: 3 ticks on the first segment, 4 on the second
    assert_eq!(outcomes.len(), 7);
    assert_eq!(outcomes[2], TickOutcome::ReachedVertex);
    assert_eq!(outcomes[6], TickOutcome::Arrived);
    assert_eq!(engine.state().car.position, Point::new(130.0, 140.0));
    assert_abs_diff_eq!(engine.state().metrics.distance_traveled, 70.0, epsilon = 1e-9);

    let chart = ChartLayout::new(&engine.state().metrics, 600.0, 300.0).unwrap();
    assert_eq!(chart.plot_points(&engine.state().metrics.speed_samples).len(), 7);

    // reset keeps the metrics of the finished run
    assert!(engine.reset());
    assert_eq!(engine.phase(), SimPhase::Paused);
    assert_eq!(engine.state().car.position, Point::new(100.0, 100.0));
    assert_abs_diff_eq!(engine.state().metrics.distance_traveled, 70.0, epsilon = 1e-9);

    // clear empties everything and parks the car at the default position
    assert!(engine.clear());
    assert!(engine.state().path.is_empty());
    assert_eq!(engine.state().car.position, DEFAULT_CAR_POSITION);
    assert_eq!(engine.state().metrics.distance_traveled, 0.0);
    assert!(engine.state().metrics.speed_samples.is_empty());

    let scene = render_scene(engine.state(), &CanvasSpec::default(), RgbColor::RED);
    assert!(!scene.is_empty());
}

#[test]
fn headless_demo_drive_arrives() {
    let canvas = CanvasSpec::default();
    let path = demo_path(&canvas, 42).unwrap();
    let setup = DriveSetup {
        target_speed: 8,
        tick_period: Duration::from_millis(50),
        clock_period: Duration::from_millis(100),
        max_ticks: 100_000,
    };

    let result = handle_drive(&EnginePars::default(), &path, &setup).unwrap();
    assert!(result.arrived);
    assert_abs_diff_eq!(result.distance_traveled, path.length(), epsilon = 1e-6);
    assert_eq!(result.max_speed, 8.0);
    assert_eq!(result.speed_samples.len() as u64, result.no_ticks);
}
