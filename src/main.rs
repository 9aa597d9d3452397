mod app;
mod audio;
mod catalog;
mod config;
mod error;
mod media;
mod mpris;
mod queue;
mod runtime;
mod session;
mod track;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
