//! Study Time Prediction Example
//!
//! Fills the predictor form from `field=value` arguments and prints the
//! prediction.
//!
//! To run this example:
//! ```
//! cargo run --example predict -- age=17 failures=1 absences=4 internet=1
//! ```

use planner_sdk::{
    config::{PlannerConfig, ServiceConfig},
    screens::PredictionField,
    MemoryAuthGate, PredictorScreen, ReqwestTransport,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = PlannerConfig::from_env()?;
    config.validate()?;
    println!("Using planner backend at {}", config.base_url);

    let gate = MemoryAuthGate::authenticated();
    let mut screen = PredictorScreen::mount(&gate, Arc::new(ReqwestTransport::new(config)?))?;

    for arg in std::env::args().skip(1) {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected field=value, got {}", arg))?;
        screen.set_named_field(name, value)?;
    }

    println!("\nSubmitting:");
    for field in PredictionField::ALL {
        println!("  {:<28} {}", field.label(), screen.form().get(field));
    }

    screen.submit()?.settled().await;

    let state = screen.state();
    if let Some(view) = state.view() {
        println!("\nPredicted study time: {} hours/day", view.study_hours);
        if let Some(confidence) = view.confidence_percent {
            println!("Confidence: {}%", confidence);
        }
        for factor in &view.factors {
            println!("  - {}", factor);
        }
        if let Some(recommendation) = &view.recommendation {
            println!("\n{}", recommendation);
        }
    } else if let Some(info) = state.error() {
        eprintln!("Prediction failed: {}", info);
    }

    Ok(())
}
