pub mod ask;
pub mod doctor;
pub mod models;
pub mod serve;
pub mod status;
pub mod tool;

use dsatutor_config::AppConfig;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load().map_err(|e| format!("Failed to load config: {e}").into())
}
