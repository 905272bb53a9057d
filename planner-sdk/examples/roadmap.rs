//! Roadmap Example
//!
//! Generates a learning roadmap and saves it as a text file.
//!
//! To run this example:
//! ```
//! cargo run --example roadmap -- Rust ./downloads
//! ```

use planner_sdk::{
    transport_from_env, DirectoryDownloads, ExportOutcome, MemoryAuthGate, RoadmapBuilderScreen,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let topic = args.next().unwrap_or_default();
    let out_dir = args.next().unwrap_or_else(|| ".".to_string());

    let gate = MemoryAuthGate::authenticated();
    let mut screen = RoadmapBuilderScreen::mount(&gate, transport_from_env()?)?;
    screen.set_topic(topic);

    let submission = match screen.generate() {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("{}", e.message());
            std::process::exit(2);
        }
    };
    submission.settled().await;

    if let Some(info) = screen.state().error() {
        eprintln!("Roadmap failed: {}", info);
        std::process::exit(1);
    }

    for (index, step) in screen.steps().iter().enumerate() {
        println!("{:>3}. {}", index + 1, step);
    }

    match screen.download(&DirectoryDownloads::new(&out_dir)) {
        ExportOutcome::Exported => println!("\nSaved to {}", out_dir),
        ExportOutcome::Failed(message) => eprintln!("\nCould not save roadmap: {}", message),
        ExportOutcome::NothingToExport => {}
    }

    Ok(())
}
