//! Scripted console demo
//!
//! Wires the pipeline with the embedded tables and runs a short exchange,
//! printing each turn. `RUST_LOG=debug` shows the pipeline internals.

use anyhow::Result;
use sales_assist_agent::AssistPipeline;
use sales_assist_config::{load_settings, DomainConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings(None)?;
    let domain = match settings.domain_config_dir.as_deref() {
        Some(dir) => DomainConfig::load_from_dir(dir)?,
        None => DomainConfig::default(),
    };
    let pipeline = AssistPipeline::new(&settings, domain);
    let shutdown = pipeline.sessions().start_cleanup_task();

    let session_id = "console-demo";
    let script = [
        "Can you help me with my HEP pricing in Solution Builder?",
        "The deal is worth $250k and they want a 25% discount",
        "What's the max discount for enterprise renewals?",
        "We're losing to a competitor, need approval by end of quarter",
    ];

    for message in script {
        println!("\n> {}", message);
        let response = pipeline.handle_message(session_id, message).await;
        println!("{}", response.response);
        for action in &response.actions {
            println!("  [{}]", action.label);
        }
    }

    if let Some(session) = pipeline.sessions().get(session_id) {
        let draft = session.context.read().current_deal.clone();
        if let Some(draft) = draft {
            println!("\n--- evaluating drafted case: {} ---", draft.summary());
            let evaluation = pipeline.evaluate_case(&draft);
            println!(
                "compliance: {} (score {})",
                evaluation.compliance.overall, evaluation.compliance.score
            );
            println!(
                "routing: {} via {} ({})",
                evaluation.routing.primary_approver,
                evaluation.routing.team,
                evaluation.routing.expected_timeline
            );
            let receipt = pipeline.submit_case(&draft).await?;
            println!("submitted: {} at {}", receipt.case_id, receipt.submitted_at);
        }
    }

    shutdown.send(true)?;
    Ok(())
}
