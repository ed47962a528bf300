use crate::core::chart_export::{chart_file_path, export_speed_chart};
use crate::interfaces::drivesim_interface::DrivesimInterface;
use drivesim::core::chart::ChartLayout;
use drivesim::core::geometry::Point;
use drivesim::core::render::{render_scene, CanvasSpec};
use drivesim::core::state::{SimPhase, SimState};
use drivesim::interfaces::gui_interface::{Primitive, RgbColor, Scene, TextAnchor};
use drivesim::pre::read_sim_pars::SimPars;
use eframe::{egui, epi};
use helpers::buffer::RingBuffer;
use helpers::general::format_elapsed;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

const INSTRUCTIONS: &str =
    "Draw a path on the canvas by dragging the mouse, then press Start and accelerate the car.";

#[derive(Debug)]
pub struct DrivePlot {
    pub drivesim_interface: DrivesimInterface,
    pub canvas: CanvasSpec,
    pub chart_size: egui::Vec2,
    pub car_color: RgbColor,
    pub show_metrics: bool,
    pub output_dir: PathBuf,
    pub prev_update: Instant,
    pub prev_update_durations: RingBuffer<u32>,
    pub export_msg: Option<String>,
}

impl DrivePlot {
    pub fn new(sim_pars: &SimPars, output_dir: &Path) -> anyhow::Result<DrivePlot> {
        let drivesim_interface = DrivesimInterface::new(
            sim_pars.engine_pars(),
            sim_pars.tick_period(),
            sim_pars.clock_period(),
        );

        Ok(DrivePlot {
            drivesim_interface,
            canvas: sim_pars.canvas_spec(),
            chart_size: egui::Vec2::new(sim_pars.chart.width as f32, sim_pars.chart.height as f32),
            car_color: sim_pars.car_color()?,
            show_metrics: sim_pars.show_metrics,
            output_dir: output_dir.to_owned(),
            prev_update: Instant::now(),
            prev_update_durations: RingBuffer::new(10),
            export_msg: None,
        })
    }

    fn handle_pointer(&mut self, response: &egui::Response) {
        let pointer_pos = response
            .interact_pointer_pos()
            .map(|pos| to_canvas_point(response.rect.min, pos));

        self.pointer_frame(
            response.drag_started(),
            response.dragged(),
            pointer_pos,
            response.drag_delta() != egui::Vec2::ZERO,
        );
    }

    /// Applies the pointer state of one frame to the path recorder.
    pub fn pointer_frame(
        &mut self,
        drag_started: bool,
        dragged: bool,
        pos: Option<Point>,
        moved: bool,
    ) -> Option<PointerCommand> {
        let recording = self.drivesim_interface.state().phase == SimPhase::Recording;
        let command = pointer_command(drag_started, dragged, pos, moved, recording, &self.canvas)?;

        match command {
            PointerCommand::Begin(p) => self.drivesim_interface.begin_path(p),
            PointerCommand::Extend(p) => self.drivesim_interface.extend_path(p),
            PointerCommand::End => self.drivesim_interface.end_path(),
        };
        Some(command)
    }

    pub fn set_ui_content(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(
            egui::Vec2::new(self.canvas.width as f32, self.canvas.height as f32),
            egui::Sense::drag(),
        );

        self.handle_pointer(&response);

        let scene = render_scene(
            self.drivesim_interface.state(),
            &self.canvas,
            self.car_color,
        );
        painter.extend(scene_shapes(&scene, response.rect.min, ui));
        response
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        let engine = &self.drivesim_interface.engine;
        let can_start = engine.can_start();
        let can_clear = engine.can_clear();
        let can_accelerate = engine.can_accelerate();
        let can_brake = engine.can_brake();
        let offers_export = self.offers_export();
        let can_export = engine.state().metrics.speed_samples.len() > 1;

        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new("Start").enabled(can_start))
                .clicked()
            {
                if let Err(err) = self.drivesim_interface.start() {
                    warn!("Failed to start the simulation: {:#}", err);
                }
            }
            if ui.button("Reset").clicked() {
                self.drivesim_interface.reset();
            }
            if ui
                .add(egui::Button::new("Clear").enabled(can_clear))
                .clicked()
            {
                self.drivesim_interface.clear();
                self.export_msg = None;
            }
            if ui
                .add(egui::Button::new("Accelerate").enabled(can_accelerate))
                .clicked()
            {
                self.drivesim_interface.accelerate();
            }
            if ui
                .add(egui::Button::new("Brake").enabled(can_brake))
                .clicked()
            {
                self.drivesim_interface.brake();
            }
            if offers_export
                && ui
                    .add(egui::Button::new("Export chart").enabled(can_export))
                    .clicked()
            {
                self.export_chart();
            }
        });
    }

    /// The chart can only be exported where it is shown.
    pub fn offers_export(&self) -> bool {
        self.show_metrics
    }

    fn export_chart(&mut self) {
        let out_path = chart_file_path(&self.output_dir, None);
        let metrics = &self.drivesim_interface.state().metrics;

        self.export_msg = Some(match export_speed_chart(metrics, &out_path) {
            Ok(path) => {
                info!("Speed chart saved to {}", path);
                format!("Chart saved to {}", path)
            }
            Err(err) => {
                warn!("Failed to export the speed chart: {:#}", err);
                format!("Chart export failed: {}", err)
            }
        });
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        let state = self.drivesim_interface.state();
        ui.label(format!("Speed: {:.0} px/frame", state.car.speed));

        let mut status = format!("Points: {}", state.path.len());
        if state.arrived() {
            status.push_str(" | Arrived");
        }
        if let Some(avg_ms) = self.prev_update_durations.get_avg() {
            if avg_ms > 0.0 {
                status.push_str(&format!(" | GUI update frequency: {:.0} Hz", 1000.0 / avg_ms));
            }
        }
        ui.label(status);

        if let Some(msg) = &self.export_msg {
            ui.label(msg);
        }
    }

    fn metrics_ui(&self, ui: &mut egui::Ui) {
        let state = self.drivesim_interface.state();
        let metrics = &state.metrics;

        ui.heading("Metrics");
        egui::Grid::new("metrics_grid").striped(true).show(ui, |ui| {
            for (label, value) in metrics_rows(state) {
                ui.label(label);
                ui.label(value);
                ui.end_row();
            }
        });

        ui.separator();
        ui.label("Speed over time");

        let (response, painter) = ui.allocate_painter(self.chart_size, egui::Sense::hover());
        if let Some(layout) = ChartLayout::new(
            metrics,
            self.chart_size.x as f64,
            self.chart_size.y as f64,
        ) {
            let scene = layout.scene(&metrics.speed_samples);
            painter.extend(scene_shapes(&scene, response.rect.min, ui));
        }
    }
}

impl epi::App for DrivePlot {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::CtxRef, _frame: &mut epi::Frame) {
        // apply the ticks of the simulation timers
        self.drivesim_interface.update();

        // calculate current UI update duration, append it to the buffer, and set update time
        self.prev_update_durations
            .push(self.prev_update.elapsed().as_millis() as u32);
        self.prev_update = Instant::now();

        if self.show_metrics {
            egui::SidePanel::right("metrics_panel").show(ctx, |ui| {
                self.metrics_ui(ui);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Path drive");
            ui.label(INSTRUCTIONS);

            let mut frame = egui::Frame::dark_canvas(ui.style());
            frame.fill = egui::Color32::WHITE;
            frame.show(ui, |ui| {
                self.set_ui_content(ui);
            });

            self.controls_ui(ui);
            self.status_ui(ui);
        });

        // keep repainting while the car is driving
        if self.drivesim_interface.timers_active() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self) {
        self.drivesim_interface.shutdown();
    }

    fn name(&self) -> &str {
        "Path Drive"
    }
}

/// Rows of the metrics table (label, formatted value).
pub fn metrics_rows(state: &SimState) -> Vec<(&'static str, String)> {
    let metrics = &state.metrics;
    vec![
        ("Elapsed time:", format_elapsed(metrics.elapsed_s)),
        ("Distance:", format!("{:.1} px", metrics.distance_traveled)),
        ("Current speed:", format!("{:.2} px/frame", state.car.speed)),
        ("Max speed:", format!("{:.2} px/frame", metrics.max_speed)),
        ("Average speed:", format!("{:.2} px/s", metrics.average_speed)),
        ("Path length:", format!("{:.1} px", state.path.length())),
    ]
}

// -------------------------------------------------------------------------------------------------
// POINTER INPUT -----------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerCommand {
    Begin(Point),
    Extend(Point),
    End,
}

/// Decides what the pointer state of one frame means for the path recording: pressing begins a
/// new path, every movement inside the canvas extends it, and releasing the button or leaving the
/// canvas ends it. Once ended, a drag that comes back into the canvas does not extend the path.
pub fn pointer_command(
    drag_started: bool,
    dragged: bool,
    pos: Option<Point>,
    moved: bool,
    recording: bool,
    canvas: &CanvasSpec,
) -> Option<PointerCommand> {
    if drag_started {
        return pos.map(PointerCommand::Begin);
    }
    if !recording {
        return None;
    }
    if !dragged {
        return Some(PointerCommand::End);
    }

    let p = pos?;
    if !canvas.contains(&p) {
        Some(PointerCommand::End)
    } else if moved {
        Some(PointerCommand::Extend(p))
    } else {
        None
    }
}

// -------------------------------------------------------------------------------------------------
// SCENE CONVERSION --------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

/// Converts a scene given in surface coordinates into egui shapes placed at `origin`.
pub fn scene_shapes(scene: &Scene, origin: egui::Pos2, ui: &egui::Ui) -> Vec<egui::Shape> {
    let mut shapes = Vec::with_capacity(scene.len());

    for primitive in scene.iter() {
        match primitive {
            Primitive::Polyline {
                points,
                width,
                color,
            } => shapes.push(egui::Shape::line(
                points.iter().map(|p| to_screen_pos(origin, p)).collect(),
                egui::Stroke::new(*width, to_color32(*color)),
            )),
            Primitive::Polygon { points, fill } => shapes.push(egui::Shape::convex_polygon(
                points.iter().map(|p| to_screen_pos(origin, p)).collect(),
                to_color32(*fill),
                egui::Stroke::none(),
            )),
            Primitive::Text {
                pos,
                text,
                anchor,
                color,
            } => shapes.push(egui::Shape::text(
                ui.fonts(),
                to_screen_pos(origin, pos),
                to_align(*anchor),
                text,
                egui::TextStyle::Small,
                to_color32(*color),
            )),
        }
    }

    shapes
}

pub fn to_screen_pos(origin: egui::Pos2, p: &Point) -> egui::Pos2 {
    egui::Pos2 {
        x: origin.x + p.x as f32,
        y: origin.y + p.y as f32,
    }
}

pub fn to_canvas_point(origin: egui::Pos2, pos: egui::Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

pub fn to_color32(color: RgbColor) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn to_align(anchor: TextAnchor) -> egui::Align2 {
    match anchor {
        TextAnchor::CenterTop => egui::Align2::CENTER_TOP,
        TextAnchor::CenterCenter => egui::Align2::CENTER_CENTER,
        TextAnchor::RightCenter => egui::Align2::RIGHT_CENTER,
        TextAnchor::LeftBottom => egui::Align2::LEFT_BOTTOM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use drivesim::pre::read_sim_pars::Variant;

    #[test]
    fn canvas_and_screen_coordinates_are_inverse() {
        let origin = egui::Pos2 { x: 12.0, y: 80.0 };
        let p = Point::new(150.0, 42.5);
        let screen = to_screen_pos(origin, &p);
        assert_eq!(screen, egui::Pos2 { x: 162.0, y: 122.5 });

        let back = to_canvas_point(origin, screen);
        assert_abs_diff_eq!(back.x, p.x);
        assert_abs_diff_eq!(back.y, p.y);
    }

    #[test]
    fn colors_and_anchors_are_mapped() {
        assert_eq!(
            to_color32(RgbColor::new(224, 224, 224)),
            egui::Color32::from_rgb(224, 224, 224)
        );
        assert_eq!(to_align(TextAnchor::RightCenter), egui::Align2::RIGHT_CENTER);
        assert_eq!(to_align(TextAnchor::LeftBottom), egui::Align2::LEFT_BOTTOM);
    }

    #[test]
    fn plot_follows_the_parameters() {
        let mut sim_pars = SimPars::default();
        sim_pars.show_metrics = false;
        sim_pars.chart.width = 400.0;
        let plot = DrivePlot::new(&sim_pars, Path::new("output")).unwrap();
        assert!(!plot.show_metrics);
        assert_eq!(plot.chart_size.x, 400.0);
        assert_eq!(plot.car_color, RgbColor::RED);
        assert_eq!(plot.canvas, CanvasSpec::default());
        assert!(!plot.drivesim_interface.timers_active());
    }

    fn recording_plot() -> DrivePlot {
        DrivePlot::new(&SimPars::default(), Path::new("output")).unwrap()
    }

    #[test]
    fn pointer_commands_follow_the_drag() {
        let canvas = CanvasSpec::default();
        let inside = Some(Point::new(100.0, 100.0));
        let outside = Some(Point::new(-5.0, 100.0));

        assert_eq!(
            pointer_command(true, true, inside, true, false, &canvas),
            Some(PointerCommand::Begin(Point::new(100.0, 100.0)))
        );
        assert_eq!(
            pointer_command(false, true, inside, true, true, &canvas),
            Some(PointerCommand::Extend(Point::new(100.0, 100.0)))
        );
        // holding the pointer still adds nothing
        assert_eq!(pointer_command(false, true, inside, false, true, &canvas), None);
        assert_eq!(
            pointer_command(false, true, outside, true, true, &canvas),
            Some(PointerCommand::End)
        );
        // back inside after the recording ended
        assert_eq!(pointer_command(false, true, inside, true, false, &canvas), None);
        assert_eq!(
            pointer_command(false, false, None, false, true, &canvas),
            Some(PointerCommand::End)
        );
        assert_eq!(pointer_command(false, false, None, false, false, &canvas), None);
    }

    #[test]
    fn leaving_the_canvas_ends_the_recording_for_good() {
        let mut plot = recording_plot();

        plot.pointer_frame(true, true, Some(Point::new(100.0, 100.0)), false);
        assert_eq!(plot.drivesim_interface.state().phase, SimPhase::Recording);
        assert_eq!(plot.drivesim_interface.state().car.position, Point::new(100.0, 100.0));

        plot.pointer_frame(false, true, Some(Point::new(100.0, 100.0)), false);
        assert_eq!(plot.drivesim_interface.state().path.len(), 1);

        plot.pointer_frame(false, true, Some(Point::new(110.0, 105.0)), true);
        assert_eq!(plot.drivesim_interface.state().path.len(), 2);

        assert_eq!(
            plot.pointer_frame(false, true, Some(Point::new(700.0, 105.0)), true),
            Some(PointerCommand::End)
        );
        assert_eq!(plot.drivesim_interface.state().phase, SimPhase::Idle);

        assert_eq!(plot.pointer_frame(false, true, Some(Point::new(120.0, 110.0)), true), None);
        assert_eq!(plot.pointer_frame(false, false, None, false), None);
        assert_eq!(
            plot.drivesim_interface.state().path.points(),
            &[Point::new(100.0, 100.0), Point::new(110.0, 105.0)]
        );
        assert!(plot.drivesim_interface.engine.can_start());
    }

    #[test]
    fn releasing_the_button_ends_the_recording() {
        let mut plot = recording_plot();
        plot.pointer_frame(true, true, Some(Point::new(10.0, 10.0)), false);
        plot.pointer_frame(false, true, Some(Point::new(20.0, 10.0)), true);

        assert_eq!(plot.pointer_frame(false, false, None, false), Some(PointerCommand::End));
        assert_eq!(plot.drivesim_interface.state().phase, SimPhase::Idle);
        assert_eq!(plot.drivesim_interface.state().path.len(), 2);
    }

    #[test]
    fn chart_export_only_in_the_extended_variant() {
        let mut basic = SimPars::default();
        basic.apply_variant(Variant::Basic);
        let plot = DrivePlot::new(&basic, Path::new("output")).unwrap();
        assert!(!plot.offers_export());

        let mut extended = SimPars::default();
        extended.apply_variant(Variant::Extended);
        let plot = DrivePlot::new(&extended, Path::new("output")).unwrap();
        assert!(plot.offers_export());
    }

    #[test]
    fn metrics_table_shows_the_current_speed() {
        let mut state = SimState::default();
        state.car.speed = 7.0;
        state.metrics.max_speed = 9.0;
        state.metrics.elapsed_s = 4.25;

        let rows = metrics_rows(&state);
        assert_eq!(rows[0], ("Elapsed time:", String::from("00:04.2")));
        assert!(rows.contains(&("Current speed:", String::from("7.00 px/frame"))));
        assert!(rows.contains(&("Max speed:", String::from("9.00 px/frame"))));
    }
}
