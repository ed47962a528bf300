pub mod core {
    pub mod chart_export;
    pub mod gui;
}
pub mod interfaces {
    pub mod drivesim_interface;
}
