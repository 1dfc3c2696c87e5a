//! `dsatutor doctor`: Diagnose configuration and connectivity.

use dsatutor_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 DSA Tutor Doctor");
    println!("===================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file at {}", config_path.display());
    } else {
        println!("  ℹ️  No config file at {} (defaults in use)", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the configuration and run again.");
            return Ok(());
        }
    };

    if !config.has_api_key() {
        println!("  ❌ No API key. Set DSATUTOR_API_KEY or GROQ_API_KEY");
        println!("     Every reply will use the offline fallback.");
        issues += 1;
    } else {
        println!("  ✅ API key configured");
        match dsatutor_providers::build_from_config(&config) {
            None => {
                println!("  ❌ Could not create a client for provider '{}'", config.provider);
                issues += 1;
            }
            Some(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ {} reachable", provider.name()),
                Ok(false) => {
                    println!("  ❌ {} rejected the request (check the API key)", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ {} unreachable: {e}", provider.name());
                    issues += 1;
                }
            },
        }
    }

    if config.gateway.session_secret == AppConfig::default().gateway.session_secret {
        println!("  ⚠️  Using the development session secret; set DSATUTOR_SESSION_SECRET");
        issues += 1;
    } else {
        println!("  ✅ Session secret set");
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
