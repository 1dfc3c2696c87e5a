//! `dsatutor status`: Show the effective configuration.

use dsatutor_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    println!("🎓 DSA Tutor Status");
    println!("===================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Provider:      {}", config.provider);
    println!(
        "  API URL:       {}",
        config
            .api_url
            .as_deref()
            .or_else(|| dsatutor_providers::router::default_base_url(&config.provider))
            .unwrap_or("(unknown provider)")
    );
    println!(
        "  API key:       {}",
        if config.has_api_key() { "set" } else { "missing" }
    );
    println!("  Candidates:    {}", config.candidate_models().join(", "));
    println!(
        "  Generation:    temperature {} · max_tokens {}",
        config.models.temperature, config.models.max_tokens
    );
    println!(
        "  Retry:         {} rounds · {} ms backoff step",
        config.retry.rounds, config.retry.backoff_step_ms
    );
    println!(
        "  Context:       last {} exchanges · {}/{} chars",
        config.context.max_exchanges, config.context.user_chars, config.context.tutor_chars
    );
    println!("  Gateway:       {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "  Sessions:      idle TTL {}s, at most {}",
        config.gateway.session_ttl_secs, config.gateway.max_sessions
    );
    println!(
        "  System prompt: {}",
        if config.tutor.system_prompt_override.is_some() { "custom" } else { "built-in" }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ℹ️  No config file; using defaults and environment");
    }

    Ok(())
}
