mod app;
mod audio;
mod config;
mod library;
mod logging;
mod runtime;
mod ui;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
