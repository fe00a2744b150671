mod app;
mod config;
mod coordinator;
mod engine;
mod error;
mod library;
mod mpris;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
