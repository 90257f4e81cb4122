use std::process::ExitCode;

use orient_lab::Settings;

fn load_settings() -> orient_lab::Result<Settings> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            log::info!("loading settings from {}", path.to_string_lossy());
            Settings::from_json_file(path)
        }
        None => Ok(Settings::load().unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            Settings::default()
        })),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = load_settings().and_then(orient_lab::run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
