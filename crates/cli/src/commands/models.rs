//! `dsatutor models`: List models offered by the completion API.

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let provider = dsatutor_providers::build_from_config(&config)
        .ok_or("client not initialized: set DSATUTOR_API_KEY or GROQ_API_KEY")?;

    let models = provider.list_models().await?;
    let candidates = config.candidate_models();

    println!("📚 Models available from {}", provider.name());
    for model in &models {
        let marker = if candidates.contains(model) { "★" } else { " " };
        println!("  {marker} {model}");
    }
    println!();
    println!("  ★ = tried by the tutor, in order: {}", candidates.join(", "));

    Ok(())
}
