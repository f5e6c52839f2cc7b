#![allow(dead_code)]

pub mod golden;
pub mod synthetic_mesh;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
