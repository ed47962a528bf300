pub mod core {
    pub mod chart;
    pub mod engine;
    pub mod geometry;
    pub mod handle_drive;
    pub mod metrics;
    pub mod path;
    pub mod recorder;
    pub mod render;
    pub mod state;
    pub mod ticker;
}
pub mod interfaces {
    pub mod gui_interface;
}
pub mod post {
    pub mod drive_result;
}
pub mod pre {
    pub mod demo_path;
    pub mod read_sim_pars;
    pub mod sim_opts;
}
