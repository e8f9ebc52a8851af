use savings_planner::{
    agent::{ConsoleIo, Orchestrator},
    completion::ChatCompletionsClient,
    config::PlannerConfig,
    models::SessionOutcome,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Logs go to stderr so prompts on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PlannerConfig::from_env()?;

    info!(
        model = %config.completion.model,
        base_url = %config.completion.base_url,
        seeded_fields = config.seed_state.len(),
        "Savings planner starting"
    );

    let client = Arc::new(ChatCompletionsClient::new(&config.completion)?);
    let orchestrator = Orchestrator::from_config(client, &config.agent);

    let mut state = config.seed_state.clone();
    let mut console = ConsoleIo::stdio();

    match orchestrator.run(&mut state, &mut console).await {
        Ok(report) => {
            info!(
                session_id = %report.session_id,
                rounds = report.rounds,
                state_hash = %report.final_state_hash,
                "Session complete"
            );
            if report.outcome == SessionOutcome::Exited {
                println!("세션을 종료합니다.");
            }
            Ok(())
        }
        Err(e) => {
            error!("Session failed: {}", e);
            eprintln!("Session failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
