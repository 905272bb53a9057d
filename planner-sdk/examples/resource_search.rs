//! Resource Search Example
//!
//! Searches the planner backend for learning resources on a topic.
//!
//! To run this example:
//! ```
//! PLANNER_API_BASE=http://127.0.0.1:5000 cargo run --example resource_search -- "Generative AI"
//! ```

use planner_sdk::{
    screens::SUGGESTIONS, transport_from_env, MemoryAuthGate, ResourceSearchScreen, SessionState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let topic = std::env::args().nth(1).unwrap_or_else(|| SUGGESTIONS[0].to_string());
    println!("Searching resources for \"{}\"...", topic);

    let gate = MemoryAuthGate::authenticated();
    let mut screen = ResourceSearchScreen::mount(&gate, transport_from_env()?)?;
    screen.set_query(topic);
    screen.search()?.settled().await;

    match screen.state() {
        SessionState::Success(bundle) if bundle.empty() => println!("No resources found."),
        SessionState::Success(bundle) => {
            println!("\nYouTube:");
            for video in &bundle.youtube_videos {
                println!("  {} - {}", video.title, video.watch_url());
            }
            println!("\nCoursera:");
            for course in &bundle.coursera_courses {
                println!("  {} - {}", course.title, course.url);
            }
            println!("\nGitHub:");
            for repo in &bundle.github_repos {
                println!("  {} - {}", repo.repo, repo.url);
            }
        }
        SessionState::Failed(info) => eprintln!("Search failed: {}", info),
        other => eprintln!("Unexpected state: {:?}", other),
    }

    Ok(())
}
