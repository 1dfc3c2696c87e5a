//! `dsatutor serve`: Start the HTTP server.

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🎓 DSA Tutor");
    println!("   Listening:    http://{}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Model client: {}",
        if config.has_api_key() { "configured" } else { "not configured (offline replies)" }
    );

    dsatutor_gateway::start(config).await?;

    Ok(())
}
